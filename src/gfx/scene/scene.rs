use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::gfx::{
    camera::{CameraController, CameraManager, OrbitCamera},
    picking::AABB,
};

use super::{
    mesh::MeshLibrary,
    node::{Node, NodeId},
};

/// Main scene: camera, mesh storage and the node graph
///
/// The graph is an arena with a single root group. Nodes are only ever appended, so
/// [`NodeId`]s handed out by a scene stay valid for its whole lifetime.
pub struct Scene {
    pub camera_manager: CameraManager,
    pub meshes: MeshLibrary,
    nodes: Vec<Node>,
    root: NodeId,
}

impl Scene {
    /// Creates a new scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            meshes: MeshLibrary::new(),
            nodes: vec![Node::group("root")],
            root: NodeId(0),
        }
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Total number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// All nodes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i), node))
    }

    /// Appends `node` under `parent` and returns its handle
    ///
    /// # Panics
    /// Panics if `parent` was not issued by this scene.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        assert!(
            parent.0 < self.nodes.len(),
            "parent {:?} does not belong to this scene",
            parent
        );

        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Appends `node` directly under the root
    pub fn add_to_root(&mut self, node: Node) -> NodeId {
        self.add_child(self.root, node)
    }

    /// Walks from `id`'s parent up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.node(id).and_then(Node::parent),
        }
    }

    /// Depth-first list of `id` and everything below it
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else {
                continue;
            };
            out.push(current);
            // Reverse so children come out in insertion order
            stack.extend(node.children.iter().rev().copied());
        }

        out
    }

    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// World matrix of a node (product of all ancestor local matrices)
    pub fn world_transform(&self, id: NodeId) -> Matrix4<f32> {
        let Some(node) = self.node(id) else {
            return Matrix4::identity();
        };

        let mut matrix = node.local_matrix();
        for ancestor in self.ancestors(id) {
            matrix = self.nodes[ancestor.0].local_matrix() * matrix;
        }
        matrix
    }

    /// World-space bounds of every mesh at or below `id`
    pub fn world_bounds(&self, id: NodeId) -> Option<AABB> {
        self.descendants(id)
            .into_iter()
            .filter_map(|node_id| {
                let mesh = self.nodes[node_id.0].mesh?;
                let entry = self.meshes.get(mesh)?;
                Some(entry.bounds.transform(&self.world_transform(node_id)))
            })
            .reduce(|a, b| a.union(&b))
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let meshes = self.nodes.iter().filter_map(|node| node.mesh);

        let (total_triangles, total_vertices) = meshes
            .filter_map(|id| self.meshes.get(id))
            .fold((0, 0), |(tris, verts), entry| {
                (
                    tris + entry.geometry.triangle_count(),
                    verts + entry.geometry.vertex_count(),
                )
            });

        SceneStatistics {
            node_count: self.nodes.len(),
            mesh_count: self.meshes.len(),
            total_triangles,
            total_vertices,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        let camera = OrbitCamera::new(5.0, 0.3, 0.0, Vector3::new(0.0, 0.4, 0.0), 1.0);
        let controller = CameraController::new(0.005, 0.1);
        Self::new(CameraManager::new(camera, controller))
    }
}

/// Iterator over a node's ancestors, nearest first
pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.scene.node(current).and_then(Node::parent);
        Some(current)
    }
}

/// Scene statistics for logging and UI display
#[derive(Debug)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::PrimitiveShape, material::Material, scene::mesh::ShapeFactory,
        scene::node::Transform,
    };
    use cgmath::Vector4;

    #[test]
    fn test_add_child_links_parent_and_children() {
        let mut scene = Scene::default();
        let group = scene.add_to_root(Node::group("group"));
        let child = scene.add_child(group, Node::group("child"));

        assert_eq!(scene.node(child).unwrap().parent(), Some(group));
        assert_eq!(scene.node(group).unwrap().children(), &[child]);
        assert_eq!(scene.node(scene.root()).unwrap().children(), &[group]);
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_ancestors_end_at_root() {
        let mut scene = Scene::default();
        let a = scene.add_to_root(Node::group("a"));
        let b = scene.add_child(a, Node::group("b"));
        let c = scene.add_child(b, Node::group("c"));

        let chain: Vec<_> = scene.ancestors(c).collect();
        assert_eq!(chain, vec![b, a, scene.root()]);
        assert!(scene.is_descendant_of(c, scene.root()));
        assert!(!scene.is_descendant_of(a, c));
        assert_eq!(scene.ancestors(scene.root()).count(), 0);
    }

    #[test]
    fn test_descendants_in_insertion_order() {
        let mut scene = Scene::default();
        let a = scene.add_to_root(Node::group("a"));
        let a1 = scene.add_child(a, Node::group("a1"));
        let a2 = scene.add_child(a, Node::group("a2"));
        let a1x = scene.add_child(a1, Node::group("a1x"));

        assert_eq!(scene.descendants(a), vec![a, a1, a1x, a2]);
    }

    #[test]
    fn test_world_transform_composes_parents() {
        let mut scene = Scene::default();
        let group = scene.add_to_root(
            Node::group("group").with_transform(Transform::from_position(Vector3::new(1.0, 0.0, 0.0))),
        );
        let child = scene.add_child(
            group,
            Node::group("child").with_transform(Transform::from_position(Vector3::new(0.0, 2.0, 0.0))),
        );

        let p = scene.world_transform(child) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p.truncate(), Vector3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_world_bounds_and_statistics() {
        let mut scene = Scene::default();
        let mesh = scene.meshes.mesh_for(&PrimitiveShape::cuboid(1.0, 1.0, 1.0));
        let group = scene.add_to_root(
            Node::group("group").with_transform(Transform::from_position(Vector3::new(3.0, 0.0, 0.0))),
        );
        scene.add_child(group, Node::mesh("a", mesh, Material::default()));
        scene.add_child(
            group,
            Node::mesh("b", mesh, Material::default())
                .with_transform(Transform::from_position(Vector3::new(0.0, 2.0, 0.0))),
        );

        let bounds = scene.world_bounds(group).unwrap();
        assert_eq!(bounds.min, Vector3::new(2.5, -0.5, -0.5));
        assert_eq!(bounds.max, Vector3::new(3.5, 2.5, 0.5));
        assert!(scene.world_bounds(scene.root()).is_some());

        let stats = scene.get_statistics();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.mesh_count, 1);
        assert_eq!(stats.total_triangles, 24);
        assert_eq!(stats.total_vertices, 48);
    }
}
