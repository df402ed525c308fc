//! WGPU utility functions and helpers
//!
//! Typed uniform buffers and the binding types the mesh pipeline declares.

pub mod binding_types;
pub mod uniform_buffer;

// Re-export main types
pub use uniform_buffer::{DynamicUniformBuffer, UniformBuffer};
