//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes a figure is assembled from, so the viewer never
//! needs external model files.
//!
//! ## Supported Primitives
//!
//! - **Box**: axis-aligned cuboid with independent width, height and depth
//! - **Sphere**: UV sphere with configurable resolution
//!
//! Shapes are described as data through [`PrimitiveShape`] and turned into
//! [`GeometryData`] with [`PrimitiveShape::generate`].
//!
//! ## Usage
//!
//! ```rust
//! use troupe::gfx::geometry::{generate_box, PrimitiveShape};
//!
//! let body = generate_box(0.4, 0.54, 0.2);
//! assert_eq!(body.triangle_count(), 12);
//!
//! let head = PrimitiveShape::sphere(0.15).generate();
//! assert!(head.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::picking::AABB;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as vertex position triples
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Local-space bounding box of all vertices
    pub fn bounds(&self) -> AABB {
        AABB::from_vertices(&self.vertices)
    }

    /// Interleave positions and normals into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<crate::gfx::scene::vertex::Vertex3D> {
        use crate::gfx::scene::vertex::Vertex3D;

        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}

/// A primitive shape described by its dimensions
///
/// Two descriptors that compare equal produce identical geometry, which is what lets
/// the mesh library share one mesh between a figure's left and right limbs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveShape {
    /// Cuboid centred on the origin
    Box { width: f32, height: f32, depth: f32 },
    /// UV sphere centred on the origin
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl PrimitiveShape {
    pub const fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            width,
            height,
            depth,
        }
    }

    /// Sphere with the default 32 x 16 tessellation
    pub const fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius,
            width_segments: 32,
            height_segments: 16,
        }
    }

    /// Build the triangle mesh for this shape
    pub fn generate(&self) -> GeometryData {
        match *self {
            Self::Box {
                width,
                height,
                depth,
            } => generate_box(width, height, depth),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => generate_sphere(radius, width_segments, height_segments),
        }
    }
}
