// src/lib.rs
//! Troupe
//!
//! Procedurally built humanoid figures that show an info card when the pointer is over
//! them, on a small wgpu/winit/imgui viewer.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod persona;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::TroupeApp;
pub use error::{Result, TroupeError};

/// Creates a viewer with the default configuration
pub fn default() -> anyhow::Result<TroupeApp> {
    TroupeApp::new(config::ViewerConfig::default())
}
