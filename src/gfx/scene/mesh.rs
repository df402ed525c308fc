//! CPU-side mesh storage
//!
//! Meshes are generated once per distinct [`PrimitiveShape`] and referenced from nodes
//! by [`MeshId`]. The renderer uploads them lazily; the ray-caster reads the triangles
//! and cached bounds directly.

use crate::gfx::{
    geometry::{GeometryData, PrimitiveShape},
    picking::AABB,
};

/// Handle to a mesh stored in a [`MeshLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A generated mesh together with its local-space bounds
#[derive(Debug, Clone)]
pub struct MeshEntry {
    pub shape: PrimitiveShape,
    pub geometry: GeometryData,
    pub bounds: AABB,
}

/// Anything that can turn a shape description into a mesh handle
pub trait ShapeFactory {
    fn mesh_for(&mut self, shape: &PrimitiveShape) -> MeshId;
}

/// Deduplicating store of generated meshes
#[derive(Debug, Default)]
pub struct MeshLibrary {
    entries: Vec<MeshEntry>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: MeshId) -> Option<&MeshEntry> {
        self.entries.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &MeshEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (MeshId(i), entry))
    }
}

impl ShapeFactory for MeshLibrary {
    fn mesh_for(&mut self, shape: &PrimitiveShape) -> MeshId {
        if let Some(index) = self.entries.iter().position(|entry| entry.shape == *shape) {
            return MeshId(index);
        }

        let geometry = shape.generate();
        let bounds = geometry.bounds();
        log::debug!(
            "generated mesh {} for {:?} ({} triangles)",
            self.entries.len(),
            shape,
            geometry.triangle_count()
        );

        self.entries.push(MeshEntry {
            shape: *shape,
            geometry,
            bounds,
        });
        MeshId(self.entries.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_shapes_share_a_mesh() {
        let mut library = MeshLibrary::new();
        let arm = PrimitiveShape::cuboid(0.1, 0.3, 0.1);

        let left = library.mesh_for(&arm);
        let right = library.mesh_for(&arm);
        let head = library.mesh_for(&PrimitiveShape::sphere(0.15));

        assert_eq!(left, right);
        assert_ne!(left, head);
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn test_entry_bounds_match_geometry() {
        let mut library = MeshLibrary::new();
        let id = library.mesh_for(&PrimitiveShape::cuboid(2.0, 4.0, 6.0));
        let entry = library.get(id).unwrap();

        assert_eq!(entry.bounds.max.y, 2.0);
        assert_eq!(entry.bounds.min.z, -3.0);
    }
}
