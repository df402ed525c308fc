// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! One depth-tested mesh pipeline plus the hook the imgui overlay renders through.

pub mod depth_texture;
pub mod render_engine;

// Re-export main types
pub use depth_texture::DepthTexture;
pub use render_engine::{collect_draws, DrawItem, DrawUniform, RenderEngine};
