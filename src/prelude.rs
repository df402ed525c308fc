//! # Troupe Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use troupe::prelude::*;
//!
//! let mut scene = Scene::default();
//! let mut people = HoverablePeople::default();
//! let positions = Layout::Row { spacing: 1.5 }.positions(2);
//! let placed = people.populate(&mut scene, &PersonaRoster::sample(), &positions);
//! assert_eq!(placed.len(), 2);
//! ```

// Re-export core application types
pub use crate::app::TroupeApp;
pub use crate::config::ViewerConfig;
pub use crate::error::{Result, TroupeError};

// Re-export graphics and scene types
pub use crate::gfx::camera::{CameraManager, OrbitCamera};
pub use crate::gfx::geometry::{GeometryData, PrimitiveShape};
pub use crate::gfx::picking::{Intersection, Raycaster};
pub use crate::gfx::scene::{Node, NodeId, Scene, ShapeFactory};

// Re-export persona types
pub use crate::persona::{HoverablePeople, Layout, PersonaData, PersonaRoster};

// Re-export UI types
pub use crate::ui::{DisplaySurface, InfoPanel, PanelContent};

// Re-export common external dependencies
pub use cgmath::Vector3;
pub use imgui::Ui;
