//! Hoverable humanoid figures
//!
//! [`HoverablePeople`] builds one composite figure per persona, remembers which figures it
//! made, casts the pointer ray against them and drives the info panel from the result.
//!
//! ```rust
//! use troupe::gfx::scene::Scene;
//! use troupe::persona::{HoverablePeople, PersonaData};
//!
//! let mut scene = Scene::default();
//! let mut people = HoverablePeople::default();
//! let ada = people.create_person(&mut scene, [0.0, 0.0, 0.0], PersonaData::new("Ada", "Engineer"));
//!
//! assert_eq!(people.hoverable_objects(), &[ada]);
//! assert!(scene.node(ada).unwrap().persona.as_ref().unwrap().is_hoverable);
//! ```

use std::{f32::consts::PI, sync::Arc};

use cgmath::Vector3;

use crate::{
    gfx::{
        camera::orbit_camera::OrbitCamera,
        geometry::PrimitiveShape,
        material::Material,
        picking::Raycaster,
        scene::{Node, NodeId, Scene, ShapeFactory, Transform},
    },
    persona::{PersonaData, PersonaRoster},
    ui::panel::{DisplaySurface, PanelContent},
};

/// One rigid part of a composite figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartDescriptor {
    pub name: &'static str,
    pub shape: PrimitiveShape,
    /// 24-bit `0xRRGGBB`
    pub color: u32,
    /// Offset from the figure origin
    pub position: [f32; 3],
    /// Euler angles in radians, XYZ order
    pub rotation: [f32; 3],
}

const SHIRT: u32 = 0x1e90ff;
const SKIN: u32 = 0xffd700;
const TROUSERS: u32 = 0x000080;

const ARM: PrimitiveShape = PrimitiveShape::cuboid(0.1, 0.3, 0.1);
const LEG: PrimitiveShape = PrimitiveShape::cuboid(0.15, 0.3, 0.15);

/// The six parts of a standing figure, feet near y = -0.3 and head top near y = 0.8
pub const HUMANOID_PARTS: [PartDescriptor; 6] = [
    PartDescriptor {
        name: "body",
        shape: PrimitiveShape::cuboid(0.4, 0.54, 0.2),
        color: SHIRT,
        position: [0.0, 0.25, 0.0],
        rotation: [0.0, 0.0, 0.0],
    },
    PartDescriptor {
        name: "head",
        shape: PrimitiveShape::sphere(0.15),
        color: SKIN,
        position: [0.0, 0.65, 0.0],
        rotation: [0.0, 0.0, 0.0],
    },
    PartDescriptor {
        name: "left_arm",
        shape: ARM,
        color: SHIRT,
        position: [-0.25, 0.35, 0.0],
        rotation: [0.0, 0.0, -PI / 6.0],
    },
    PartDescriptor {
        name: "right_arm",
        shape: ARM,
        color: SHIRT,
        position: [0.25, 0.35, 0.0],
        rotation: [0.0, 0.0, PI / 6.0],
    },
    PartDescriptor {
        name: "left_leg",
        shape: LEG,
        color: TROUSERS,
        position: [-0.1, -0.15, 0.1],
        rotation: [-PI / 2.0, 0.0, 0.0],
    },
    PartDescriptor {
        name: "right_leg",
        shape: LEG,
        color: TROUSERS,
        position: [0.1, -0.15, 0.1],
        rotation: [-PI / 2.0, 0.0, 0.0],
    },
];

/// Builds a group under the scene root holding one mesh node per part
///
/// The group and every part point their `hover_target` at the group.
pub fn build_composite(scene: &mut Scene, parts: &[PartDescriptor]) -> NodeId {
    let group = scene.add_to_root(Node::group("person"));

    for part in parts {
        let mesh = scene.meshes.mesh_for(&part.shape);
        let transform = Transform::from_position(Vector3::from(part.position))
            .with_rotation(Vector3::from(part.rotation));

        let mut node = Node::mesh(part.name, mesh, Material::phong(part.color)).with_transform(transform);
        node.hover_target = Some(group);
        scene.add_child(group, node);
    }

    if let Some(node) = scene.node_mut(group) {
        node.hover_target = Some(group);
    }
    group
}

/// Factory, hover detector and panel updater for persona figures
#[derive(Debug, Clone, Default)]
pub struct HoverablePeople {
    raycaster: Raycaster,
    hoverable_objects: Vec<NodeId>,
    hovered: Option<NodeId>,
}

impl HoverablePeople {
    pub fn new(raycaster: Raycaster) -> Self {
        Self {
            raycaster,
            hoverable_objects: Vec::new(),
            hovered: None,
        }
    }

    /// Builds a figure at `position` carrying `persona` and starts tracking it
    pub fn create_person(
        &mut self,
        scene: &mut Scene,
        position: [f32; 3],
        mut persona: PersonaData,
    ) -> NodeId {
        persona.is_hoverable = true;

        let group = build_composite(scene, &HUMANOID_PARTS);
        if let Some(node) = scene.node_mut(group) {
            node.name = if persona.has_name() {
                persona.name.clone()
            } else {
                "person".to_string()
            };
            node.transform.position = Vector3::from(position);
            node.persona = Some(Arc::new(persona));
        }

        self.hoverable_objects.push(group);
        log::debug!("created person {:?} at {:?}", group, position);
        group
    }

    /// A nameless figure at the origin
    pub fn create_person_default(&mut self, scene: &mut Scene) -> NodeId {
        self.create_person(scene, [0.0, 0.0, 0.0], PersonaData::default())
    }

    /// Creates one figure per persona, pairing them with `positions` in order
    ///
    /// Personas without a position are not placed.
    pub fn populate(
        &mut self,
        scene: &mut Scene,
        roster: &PersonaRoster,
        positions: &[[f32; 3]],
    ) -> Vec<NodeId> {
        if roster.len() > positions.len() {
            log::warn!(
                "{} personas but only {} positions; skipping the rest",
                roster.len(),
                positions.len()
            );
        }

        roster
            .iter()
            .zip(positions)
            .map(|(persona, &position)| self.create_person(scene, position, persona.clone()))
            .collect()
    }

    /// Returns the record of the nearest figure under the pointer
    ///
    /// `ndc` is the pointer in normalized device coordinates. Figures whose record has
    /// no name are treated as misses.
    pub fn check_hover(
        &mut self,
        ndc: (f32, f32),
        camera: &OrbitCamera,
        scene: &Scene,
    ) -> Option<Arc<PersonaData>> {
        self.raycaster.set_from_camera(ndc, camera);
        let hits = self
            .raycaster
            .intersect_objects(scene, &self.hoverable_objects, true);

        let hovered = hits.first().and_then(|hit| {
            let target = scene.node(hit.node)?.hover_target?;
            let persona = scene.node(target)?.persona.clone()?;
            persona.has_name().then_some((target, persona))
        });

        let target = hovered.as_ref().map(|(target, _)| *target);
        if target != self.hovered {
            log::debug!("hover target changed: {:?} -> {:?}", self.hovered, target);
            self.hovered = target;
        }

        hovered.map(|(_, persona)| persona)
    }

    /// Shows `hover` on `surface`, or hides the surface when nothing is hovered
    pub fn update_info_panel(&self, hover: Option<&PersonaData>, surface: &mut impl DisplaySurface) {
        match hover {
            Some(persona) => {
                surface.set_content(PanelContent::new(&persona.name, &persona.bio));
                surface.set_visible(true);
            }
            None => surface.set_visible(false),
        }
    }

    /// Every figure created so far, in creation order
    pub fn hoverable_objects(&self) -> &[NodeId] {
        &self.hoverable_objects
    }

    /// The figure found by the last [`check_hover`](Self::check_hover), if any
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }
}
