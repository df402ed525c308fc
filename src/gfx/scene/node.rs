use std::sync::Arc;

use cgmath::{Matrix4, Rad, Vector3, Zero};

use crate::{gfx::material::Material, persona::PersonaData};

use super::mesh::MeshId;

/// Handle to a node in a [`Scene`](super::Scene)
///
/// Nodes are never removed, so a handle stays valid for the scene that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Local transform of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Euler angles in radians, applied in X, Y, Z order
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Local matrix: T * Rx * Ry * Rz * S
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A scene graph node
///
/// A node with no mesh is a pure group. `hover_target` points at the composite a part
/// belongs to, and `persona` holds the record attached to that composite.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshId>,
    pub material: Material,
    pub visible: bool,
    pub hover_target: Option<NodeId>,
    pub persona: Option<Arc<PersonaData>>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// An empty group node
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            mesh: None,
            material: Material::default(),
            visible: true,
            hover_target: None,
            persona: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// A node that draws `mesh` with `material`
    pub fn mesh(name: impl Into<String>, mesh: MeshId, material: Material) -> Self {
        Self {
            mesh: Some(mesh),
            material,
            ..Self::group(name)
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Matrix relative to the parent node
    pub fn local_matrix(&self) -> Matrix4<f32> {
        self.transform.matrix()
    }
}
