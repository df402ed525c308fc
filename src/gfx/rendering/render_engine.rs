//! WGPU-based rendering engine for the Troupe viewer
//!
//! Draws every visible mesh node of a [`Scene`] with one flat-shaded pipeline, then hands
//! the frame to an overlay callback (the imgui pass) before presenting.

use std::{collections::HashMap, sync::Arc};

use wgpu::{util::DeviceExt, TextureFormat};

use crate::{
    error::{Result, TroupeError},
    gfx::{
        camera::CameraUniform,
        scene::{MeshId, MeshLibrary, NodeId, Scene, Vertex3D},
    },
    wgpu_utils::{binding_types, DynamicUniformBuffer, UniformBuffer},
};

use super::depth_texture::DepthTexture;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.2,
    b: 0.3,
    a: 1.0,
};

/// Per-draw uniform: must match `Draw` in shader.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x: shininess, y: highlight flag
    pub params: [f32; 4],
}

/// One mesh draw prepared from the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub mesh: MeshId,
    pub uniform: DrawUniform,
}

/// Flattens the scene into draws
///
/// Nodes hidden themselves or through an ancestor are left out. Parts whose
/// `hover_target` equals `highlighted` get the highlight flag.
pub fn collect_draws(scene: &Scene, highlighted: Option<NodeId>) -> Vec<DrawItem> {
    scene
        .iter()
        .filter_map(|(id, node)| {
            let mesh = node.mesh?;
            let visible = node.visible
                && scene
                    .ancestors(id)
                    .all(|a| scene.node(a).is_some_and(|n| n.visible));
            if !visible {
                return None;
            }

            let highlight = highlighted.is_some() && node.hover_target == highlighted;
            Some(DrawItem {
                node: id,
                mesh,
                uniform: DrawUniform {
                    model: scene.world_transform(id).into(),
                    color: node.material.base_color,
                    params: [
                        node.material.shininess,
                        if highlight { 1.0 } else { 0.0 },
                        0.0,
                        0.0,
                    ],
                },
            })
        })
        .collect()
}

/// Vertex and index buffers of one uploaded mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    format: TextureFormat,
    pipeline: wgpu::RenderPipeline,

    camera_buffer: UniformBuffer<CameraUniform>,
    camera_bind_group: wgpu::BindGroup,

    draw_buffer: DynamicUniformBuffer<DrawUniform>,
    draw_layout: wgpu::BindGroupLayout,
    draw_bind_group: wgpu::BindGroup,

    meshes: HashMap<MeshId, GpuMesh>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Errors
    /// Fails when no surface, adapter or device can be obtained.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(TroupeError::UnsupportedSurface)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, &config, "depth_texture");

        let camera_buffer = UniformBuffer::<CameraUniform>::new(&device);
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_layout"),
            entries: &[binding_types::entry(0, binding_types::uniform())],
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.binding_resource(),
            }],
        });

        let draw_buffer = DynamicUniformBuffer::<DrawUniform>::new(&device, 64);
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_layout"),
            entries: &[binding_types::entry(
                0,
                binding_types::uniform_dynamic(std::mem::size_of::<DrawUniform>() as u64),
            )],
        });
        let draw_bind_group = Self::create_draw_bind_group(&device, &draw_layout, &draw_buffer);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&camera_layout, &draw_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        Ok(RenderEngine {
            surface,
            device: device.into(),
            queue: queue.into(),
            config,
            depth_texture,
            format,
            pipeline,
            camera_buffer,
            camera_bind_group,
            draw_buffer,
            draw_layout,
            draw_bind_group,
            meshes: HashMap::new(),
        })
    }

    fn create_draw_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &DynamicUniformBuffer<DrawUniform>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.binding_resource(),
            }],
        })
    }

    /// Uploads any mesh the GPU has not seen yet
    fn upload_meshes(&mut self, library: &MeshLibrary) {
        for (id, entry) in library.iter() {
            if self.meshes.contains_key(&id) {
                continue;
            }

            let vertices = entry.geometry.to_vertices();
            let vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("mesh_{}_vertices", id.index())),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            let index_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("mesh_{}_indices", id.index())),
                    contents: bytemuck::cast_slice(&entry.geometry.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });

            log::debug!("uploaded mesh {} ({} vertices)", id.index(), vertices.len());
            self.meshes.insert(
                id,
                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: entry.geometry.indices.len() as u32,
                },
            );
        }
    }

    /// Renders the scene, then lets `ui_callback` record its overlay pass
    ///
    /// Parts of the `highlighted` composite are drawn with a rim glow. A lost or
    /// outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame_with_ui<F>(&mut self, scene: &Scene, highlighted: Option<NodeId>, ui_callback: F)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.upload_meshes(&scene.meshes);

        let draws = collect_draws(scene, highlighted);
        let uniforms: Vec<DrawUniform> = draws.iter().map(|draw| draw.uniform).collect();
        if self.draw_buffer.write(&self.device, &self.queue, &uniforms) {
            self.draw_bind_group =
                Self::create_draw_bind_group(&self.device, &self.draw_layout, &self.draw_buffer);
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                log::error!("failed to acquire surface texture: {err}");
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for (slot, draw) in draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.mesh) else {
                    continue;
                };
                render_pass.set_bind_group(1, &self.draw_bind_group, &[self.draw_buffer.offset(slot)]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        ui_callback(&self.device, &self.queue, &mut encoder, &surface_texture_view);

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Updates the camera uniform buffer
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        self.camera_buffer.update_content(&self.queue, camera_uniform);
    }

    /// Resizes the surface and recreates the depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::{geometry::PrimitiveShape, material::Material, scene::{Node, ShapeFactory}},
        persona::{HoverablePeople, PersonaData},
    };

    #[test]
    fn test_draw_uniform_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<DrawUniform>(), 96);
    }

    #[test]
    fn test_collect_draws_skips_groups_and_hidden_branches() {
        let mut scene = Scene::default();
        let mesh = scene.meshes.mesh_for(&PrimitiveShape::cuboid(1.0, 1.0, 1.0));
        let shown = scene.add_to_root(Node::group("shown"));
        let hidden = scene.add_to_root(Node::group("hidden"));
        let a = scene.add_child(shown, Node::mesh("a", mesh, Material::phong(0xff0000)));
        scene.add_child(hidden, Node::mesh("b", mesh, Material::default()));
        scene.node_mut(hidden).unwrap().visible = false;

        let draws = collect_draws(&scene, None);
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].node, a);
        assert_eq!(draws[0].uniform.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(draws[0].uniform.params[1], 0.0);
    }

    #[test]
    fn test_collect_draws_highlights_hovered_figure() {
        let mut scene = Scene::default();
        let mut people = HoverablePeople::default();
        let ada = people.create_person(&mut scene, [0.0, 0.0, 0.0], PersonaData::new("Ada", "Engineer"));
        people.create_person(&mut scene, [2.0, 0.0, 0.0], PersonaData::new("Grace", "Admiral"));

        let draws = collect_draws(&scene, Some(ada));
        assert_eq!(draws.len(), 12);
        let highlighted = draws.iter().filter(|draw| draw.uniform.params[1] == 1.0).count();
        assert_eq!(highlighted, 6);
    }
}
