//! # Scene Management Module
//!
//! Scene graph for the Troupe viewer: an append-only arena of [`Node`]s under a single
//! root, the [`MeshLibrary`] the nodes draw from, and the camera used to view them.
//!
//! ## Key Components
//!
//! - [`Scene`] - Node arena, mesh storage and camera
//! - [`Node`] - Group or mesh node with a local [`Transform`]
//! - [`MeshLibrary`] - Deduplicated procedural meshes, addressed by [`MeshId`]
//! - [`Vertex3D`] - GPU vertex layout used when meshes are uploaded
//!
//! ## Usage
//!
//! ```rust
//! use troupe::gfx::scene::{Node, Scene};
//!
//! let mut scene = Scene::default();
//! let group = scene.add_to_root(Node::group("person"));
//! assert!(scene.is_descendant_of(group, scene.root()));
//! ```

pub mod mesh;
pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use mesh::{MeshEntry, MeshId, MeshLibrary, ShapeFactory};
pub use node::{Node, NodeId, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
