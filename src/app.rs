use std::sync::Arc;

use anyhow::anyhow;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    gfx::{
        picking::cursor_to_ndc,
        rendering::RenderEngine,
        scene::{NodeId, Scene},
    },
    persona::{HoverablePeople, PersonaData, PersonaRoster},
    ui::{InfoPanel, UiManager},
};

const UI_FONT_SIZE: f32 = 20.0;

/// The persona viewer: a window full of figures that show who they are when hovered
pub struct TroupeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    people: HoverablePeople,
    info_panel: InfoPanel,
    /// Last pointer position in physical pixels, None when outside the window
    cursor: Option<(f32, f32)>,
    setup_error: Option<anyhow::Error>,
}

impl TroupeApp {
    /// Creates the event loop and an empty scene set up from `config`
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;

        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        let scene = Scene::new(config.camera.build_manager(aspect));
        let info_panel = config.panel.build_panel();

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                people: HoverablePeople::default(),
                info_panel,
                cursor: None,
                setup_error: None,
            },
        })
    }

    /// Places one figure per persona using the configured layout
    ///
    /// With `camera.frame_on_start` set, the camera is re-targeted on the whole troupe.
    pub fn populate(&mut self, roster: &PersonaRoster) -> Vec<NodeId> {
        let state = &mut self.app_state;
        let positions = state.config.layout.positions(roster.len());
        let created = state.people.populate(&mut state.scene, roster, &positions);

        if state.config.camera.frame_on_start {
            if let Some(bounds) = state.scene.world_bounds(state.scene.root()) {
                state.scene.camera_manager.camera.frame_bounds(&bounds);
            }
        }

        let stats = state.scene.get_statistics();
        log::info!(
            "placed {} people: {} nodes, {} meshes, {} triangles",
            created.len(),
            stats.node_count,
            stats.mesh_count,
            stats.total_triangles
        );
        created
    }

    /// Creates a single figure; see [`HoverablePeople::create_person`]
    pub fn add_person(&mut self, position: [f32; 3], persona: PersonaData) -> NodeId {
        let state = &mut self.app_state;
        state.people.create_person(&mut state.scene, position, persona)
    }

    pub fn scene(&self) -> &Scene {
        &self.app_state.scene
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow!("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.setup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.setup_error = Some(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state == ElementState::Pressed
            && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
        {
            event_loop.exit();
            return;
        }
        self.scene
            .camera_manager
            .handle_key(event.physical_key, event.state);
    }

    /// One frame: hover test, panel update, render
    fn redraw(&mut self) {
        let (Some(window), Some(render_engine)) = (self.window.as_ref(), self.render_engine.as_mut())
        else {
            return;
        };

        let ui_has_mouse = self
            .ui_manager
            .as_ref()
            .is_some_and(UiManager::wants_mouse);

        let hover = match self.cursor {
            Some(cursor) if !ui_has_mouse => {
                let size = window.inner_size();
                let ndc = cursor_to_ndc(cursor, (size.width as f32, size.height as f32));
                self.people
                    .check_hover(ndc, &self.scene.camera_manager.camera, &self.scene)
            }
            _ => None,
        };
        let highlighted = hover.as_ref().and(self.people.hovered());
        self.people
            .update_info_panel(hover.as_deref(), &mut self.info_panel);

        self.scene.update();
        render_engine.update(self.scene.camera_manager.camera.uniform);

        let info_panel = &self.info_panel;
        match self.ui_manager.as_mut() {
            Some(ui_manager) => render_engine.render_frame_with_ui(
                &self.scene,
                highlighted,
                |device, queue, encoder, color_attachment| {
                    ui_manager.draw(device, queue, encoder, window, color_attachment, |ui| {
                        info_panel.render(ui)
                    });
                },
            ),
            None => render_engine.render_frame_with_ui(&self.scene, highlighted, |_, _, _, _| {}),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let (width, height) = window.inner_size().into();
        let window_clone = window.clone();
        let renderer = match pollster::block_on(RenderEngine::new(window_clone, width, height)) {
            Ok(renderer) => renderer,
            Err(err) => return self.fail(event_loop, err.into()),
        };

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
            UI_FONT_SIZE,
        );
        ui_manager.update_display_size(width, height);
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);

        log::info!("window ready at {width}x{height}");
        self.window = Some(window);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Pointer and modifier state is tracked even when imgui takes the event
        match &event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some((position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::ModifiersChanged(modifiers) => {
                self.scene.camera_manager.set_modifiers(modifiers.state());
            }
            _ => (),
        }

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_window_event(&window, window_id, &event) {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self.window.is_none() {
            return;
        }

        // Camera controls pause while imgui holds the pointer
        if self.ui_manager.as_ref().is_some_and(UiManager::wants_mouse) {
            return;
        }

        self.scene.camera_manager.handle_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
