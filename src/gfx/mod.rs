//! # Graphics Module
//!
//! Everything the viewer needs to put figures on screen and find them again under the
//! pointer.
//!
//! - **Camera System** ([`camera`]) - Y-up orbit camera with mouse controls
//! - **Geometry** ([`geometry`]) - Procedural box and sphere meshes
//! - **Picking** ([`picking`]) - Pointer rays, bounding boxes and triangle hits
//! - **Rendering Pipeline** ([`rendering`]) - wgpu mesh pass with hover highlight
//! - **Scene Management** ([`scene`]) - Node arena and mesh library
//!
//! ```no_run
//! use troupe::gfx::{RenderEngine, scene::Scene};
//!
//! // The render engine is created by the viewer once a window exists
//! // let render_engine = RenderEngine::new(window, width, height).await?;
//! let scene = Scene::default();
//! ```

pub mod camera;
pub mod geometry;
pub mod material;
pub mod picking;
pub mod rendering;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
