//! # Object Picking System
//!
//! Mouse ray-casting against the scene graph.
//!
//! ## How it works
//!
//! 1. **Pointer to Ray**: unproject a normalized device coordinate through the camera
//! 2. **Broad phase**: test the ray against each mesh's local bounding box
//! 3. **Narrow phase**: test the ray against the mesh triangles in local space
//! 4. **Ordering**: return every hit sorted nearest first
//!
//! ## Usage
//!
//! ```rust
//! use troupe::gfx::picking::Raycaster;
//! use troupe::gfx::scene::Scene;
//!
//! let scene = Scene::default();
//! let mut raycaster = Raycaster::new();
//! raycaster.set_from_camera((0.0, 0.0), &scene.camera_manager.camera);
//! let hits = raycaster.intersect_objects(&scene, &[scene.root()], true);
//! assert!(hits.is_empty());
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::gfx::{
    camera::orbit_camera::OrbitCamera,
    scene::{NodeId, Scene},
};

const EPSILON: f32 = 1e-7;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Moves the ray into the space described by `matrix`
    ///
    /// The direction stays unnormalized, so a parameter `t` on the transformed ray names
    /// the same point as `t` on the original ray.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let origin = matrix * self.origin.extend(1.0);
        let direction = matrix * self.direction.extend(0.0);
        Self {
            origin: origin.truncate() / origin.w,
            direction: direction.truncate(),
        }
    }

    /// Möller–Trumbore ray/triangle test, double sided
    ///
    /// Returns the ray parameter of the hit, if it lies in front of the origin.
    pub fn intersect_triangle(&self, triangle: &[[f32; 3]; 3]) -> Option<f32> {
        let v0 = Vector3::from(triangle[0]);
        let edge1 = Vector3::from(triangle[1]) - v0;
        let edge2 = Vector3::from(triangle[2]) - v0;

        let h = self.direction.cross(edge2);
        let a = edge1.dot(h);
        if a.abs() < EPSILON {
            return None; // Parallel to the triangle plane
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl AABB {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create AABB from a set of vertices
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::from(*first);
        let mut max = min;

        for vertex in vertices.iter().skip(1) {
            let v = Vector3::from(*vertex);
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }

        Self::new(min, max)
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB::new(
            Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    /// Test ray-AABB intersection (slab method)
    /// Returns the ray parameter of the entry point, or None if no intersection
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Apply a transformation matrix to the AABB
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed_corners: Vec<[f32; 3]> = corners
            .iter()
            .map(|corner| {
                let transformed = matrix * corner.extend(1.0);
                (transformed.truncate() / transformed.w).into()
            })
            .collect();

        Self::from_vertices(&transformed_corners)
    }
}

/// One ray hit against a mesh node
#[derive(Debug, Clone)]
pub struct Intersection {
    /// The mesh node that was struck
    pub node: NodeId,
    /// Distance from the ray origin to the hit
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Casts pointer rays into a [`Scene`]
#[derive(Debug, Clone)]
pub struct Raycaster {
    pub ray: Ray,
}

impl Raycaster {
    pub fn new() -> Self {
        Self {
            ray: Ray::new(Vector3::zero(), -Vector3::unit_z()),
        }
    }

    /// Aims the ray from the camera through a pointer position
    ///
    /// `ndc` is in normalized device coordinates: x and y in [-1, 1], y up.
    pub fn set_from_camera(&mut self, ndc: (f32, f32), camera: &OrbitCamera) {
        self.ray = camera_ray(ndc, camera);
    }

    /// Intersects the current ray with `objects`
    ///
    /// With `recursive` set, every descendant of each object is tested too. Hits come
    /// back sorted by distance, nearest first.
    pub fn intersect_objects(
        &self,
        scene: &Scene,
        objects: &[NodeId],
        recursive: bool,
    ) -> Vec<Intersection> {
        let mut hits = Vec::new();

        for &object in objects {
            if recursive {
                for node in scene.descendants(object) {
                    self.intersect_node(scene, node, &mut hits);
                }
            } else {
                self.intersect_node(scene, object, &mut hits);
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn intersect_node(&self, scene: &Scene, id: NodeId, hits: &mut Vec<Intersection>) {
        let Some(node) = scene.node(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let Some(entry) = node.mesh.and_then(|mesh| scene.meshes.get(mesh)) else {
            return;
        };

        let world = scene.world_transform(id);
        let Some(inverse) = world.invert() else {
            return; // Degenerate (zero scale) node
        };
        let local_ray = self.ray.transform(&inverse);

        if entry.bounds.intersect_ray(&local_ray).is_none() {
            return;
        }

        let nearest = entry
            .geometry
            .triangles()
            .filter_map(|triangle| local_ray.intersect_triangle(&triangle))
            .min_by(f32::total_cmp);

        if let Some(distance) = nearest {
            hits.push(Intersection {
                node: id,
                distance,
                point: self.ray.point_at(distance),
            });
        }
    }
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Unprojects a normalized device coordinate into a world-space ray
pub fn camera_ray(ndc: (f32, f32), camera: &OrbitCamera) -> Ray {
    let (ndc_x, ndc_y) = ndc;
    let inv_view_proj = camera
        .build_gl_view_projection_matrix()
        .invert()
        .unwrap_or(Matrix4::identity());

    let unproject = |z: f32| {
        let p = inv_view_proj * Vector4::new(ndc_x, ndc_y, z, 1.0);
        p.truncate() / p.w
    };

    let near_3d = unproject(-1.0);
    let far_3d = unproject(1.0);
    Ray::new(near_3d, far_3d - near_3d)
}

/// Converts a window-space cursor position (pixels, y down) into NDC
pub fn cursor_to_ndc(cursor: (f32, f32), size: (f32, f32)) -> (f32, f32) {
    let (x, y) = cursor;
    let (width, height) = (size.0.max(1.0), size.1.max(1.0));
    ((2.0 * x) / width - 1.0, 1.0 - (2.0 * y) / height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::PrimitiveShape,
        material::Material,
        scene::{Node, ShapeFactory, Transform},
    };

    #[test]
    fn test_aabb_creation() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]];
        let aabb = AABB::from_vertices(&vertices);

        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = AABB::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(4.0));

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());
    }

    #[test]
    fn test_ray_triangle_intersection() {
        let triangle = [[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 1.0, 0.0]];

        let hit = Ray::new(Vector3::new(0.0, 0.0, 3.0), -Vector3::unit_z());
        assert!((hit.intersect_triangle(&triangle).unwrap() - 3.0).abs() < 1e-6);

        let behind = Ray::new(Vector3::new(0.0, 0.0, 3.0), Vector3::unit_z());
        assert!(behind.intersect_triangle(&triangle).is_none());

        let outside = Ray::new(Vector3::new(2.0, 0.0, 3.0), -Vector3::unit_z());
        assert!(outside.intersect_triangle(&triangle).is_none());
    }

    #[test]
    fn test_transformed_ray_keeps_parameter() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), -Vector3::unit_z());
        let matrix = Matrix4::from_scale(2.0);
        let local = ray.transform(&matrix.invert().unwrap());

        // The plane z = 2 in world space is z = 1 in local space: both at t = 8
        let t_local = (1.0 - local.origin.z) / local.direction.z;
        assert!((t_local - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_cursor_to_ndc() {
        assert_eq!(cursor_to_ndc((400.0, 300.0), (800.0, 600.0)), (0.0, 0.0));
        assert_eq!(cursor_to_ndc((0.0, 0.0), (800.0, 600.0)), (-1.0, 1.0));
        assert_eq!(cursor_to_ndc((800.0, 600.0), (800.0, 600.0)), (1.0, -1.0));
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::new(0.0, 0.5, 0.0), 1.0);
        let ray = camera_ray((0.0, 0.0), &camera);

        assert!((ray.direction - (-Vector3::unit_z())).magnitude() < 1e-4);
        assert!((ray.origin.y - 0.5).abs() < 1e-4);
    }

    fn scene_with_cubes(z_positions: &[f32]) -> (Scene, Vec<NodeId>) {
        let mut scene = Scene::default();
        scene.camera_manager.camera =
            OrbitCamera::new(10.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let mesh = scene.meshes.mesh_for(&PrimitiveShape::cuboid(1.0, 1.0, 1.0));

        let ids = z_positions
            .iter()
            .map(|&z| {
                let group = scene.add_to_root(
                    Node::group("group")
                        .with_transform(Transform::from_position(Vector3::new(0.0, 0.0, z))),
                );
                scene.add_child(group, Node::mesh("cube", mesh, Material::default()));
                group
            })
            .collect();

        (scene, ids)
    }

    #[test]
    fn test_intersections_sorted_nearest_first() {
        let (scene, groups) = scene_with_cubes(&[-3.0, 0.0, 2.0]);
        let mut raycaster = Raycaster::new();
        raycaster.set_from_camera((0.0, 0.0), &scene.camera_manager.camera);

        let hits = raycaster.intersect_objects(&scene, &groups, true);
        assert_eq!(hits.len(), 3);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));

        // Nearest cube is the one at z = 2, front face at z = 2.5
        let nearest = &hits[0];
        assert!(scene.is_descendant_of(nearest.node, groups[2]));
        assert!((nearest.point.z - 2.5).abs() < 1e-3);
    }

    #[test]
    fn test_non_recursive_skips_children() {
        let (scene, groups) = scene_with_cubes(&[0.0]);
        let mut raycaster = Raycaster::new();
        raycaster.set_from_camera((0.0, 0.0), &scene.camera_manager.camera);

        assert!(raycaster.intersect_objects(&scene, &groups, false).is_empty());
        assert_eq!(raycaster.intersect_objects(&scene, &groups, true).len(), 1);
    }

    #[test]
    fn test_miss_returns_empty() {
        let (scene, groups) = scene_with_cubes(&[0.0]);
        let mut raycaster = Raycaster::new();
        raycaster.set_from_camera((0.9, 0.9), &scene.camera_manager.camera);

        assert!(raycaster.intersect_objects(&scene, &groups, true).is_empty());
    }

    #[test]
    fn test_hidden_nodes_are_skipped() {
        let (mut scene, groups) = scene_with_cubes(&[0.0]);
        let cube = scene.node(groups[0]).unwrap().children()[0];
        scene.node_mut(cube).unwrap().visible = false;

        let mut raycaster = Raycaster::new();
        raycaster.set_from_camera((0.0, 0.0), &scene.camera_manager.camera);
        assert!(raycaster.intersect_objects(&scene, &groups, true).is_empty());
    }
}
