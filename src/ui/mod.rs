//! # User Interface Module
//!
//! Dear ImGui overlay for the Troupe viewer.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu
//! - [`InfoPanel`] - The floating persona card, driven through [`DisplaySurface`]
//!
//! ## Input Handling
//!
//! When imgui wants the mouse or keyboard, camera controls and hover picking are
//! suspended for that event.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{DisplaySurface, InfoPanel, PanelContent};
