use winit::{
    event::{DeviceEvent, ElementState, MouseScrollDelta},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Trackpads report pixels; one wheel notch is roughly this many
const PIXELS_PER_LINE: f32 = 20.0;

/// What a held left button does to the camera, fixed when the button goes down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    Orbit,
    Pan,
}

/// Pointer and keyboard orbit controls
///
/// Left drag orbits the target. Holding Shift when the button goes down turns the drag
/// into a pan. The wheel zooms and Shift+C returns to the framed pose.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    modifiers: ModifiersState,
    drag: Option<Drag>,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            modifiers: ModifiersState::empty(),
            drag: None,
        }
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Applies a raw device event; returns true if the camera moved
    pub fn handle_device_event(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) -> bool {
        match event {
            DeviceEvent::Button { button: 0, state } => {
                self.drag = match state {
                    ElementState::Pressed if self.modifiers.shift_key() => Some(Drag::Pan),
                    ElementState::Pressed => Some(Drag::Orbit),
                    ElementState::Released => None,
                };
                false
            }
            DeviceEvent::MouseWheel { delta } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                camera.add_distance(-lines * self.zoom_speed);
                true
            }
            DeviceEvent::MouseMotion { delta: (dx, dy) } => {
                let (dx, dy) = (*dx as f32, *dy as f32);
                match self.drag {
                    Some(Drag::Orbit) => {
                        camera.add_yaw(-dx * self.rotate_speed);
                        camera.add_pitch(dy * self.rotate_speed);
                        true
                    }
                    Some(Drag::Pan) => {
                        camera.pan((-dx * self.pan_speed, dy * self.pan_speed));
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// Shift+C resets the camera; returns true if it did
    pub fn handle_key(&mut self, key: PhysicalKey, state: ElementState, camera: &mut OrbitCamera) -> bool {
        let reset = state == ElementState::Pressed
            && key == PhysicalKey::Code(KeyCode::KeyC)
            && self.modifiers.shift_key();
        if reset {
            log::debug!("resetting camera to framed pose");
            camera.reset_to_default();
        }
        reset
    }
}

/// The scene camera together with the controls that drive it
#[derive(Debug, Clone)]
pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) -> bool {
        self.controller.handle_device_event(event, &mut self.camera)
    }

    pub fn handle_key(&mut self, key: PhysicalKey, state: ElementState) -> bool {
        self.controller.handle_key(key, state, &mut self.camera)
    }

    pub fn set_modifiers(&mut self, modifiers: ModifiersState) {
        self.controller.set_modifiers(modifiers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    fn manager() -> CameraManager {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        CameraManager::new(camera, CameraController::new(0.01, 0.5))
    }

    fn button(state: ElementState) -> DeviceEvent {
        DeviceEvent::Button { button: 0, state }
    }

    fn motion(dx: f64, dy: f64) -> DeviceEvent {
        DeviceEvent::MouseMotion { delta: (dx, dy) }
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut rig = manager();
        assert!(!rig.handle_device_event(&motion(10.0, 10.0)));
        assert_eq!(rig.camera.yaw, 0.0);
        assert_eq!(rig.camera.pitch, 0.0);
    }

    #[test]
    fn test_drag_orbits_until_release() {
        let mut rig = manager();
        rig.handle_device_event(&button(ElementState::Pressed));
        assert!(rig.handle_device_event(&motion(10.0, 5.0)));
        assert!((rig.camera.yaw + 0.1).abs() < 1e-6);
        assert!((rig.camera.pitch - 0.05).abs() < 1e-6);
        assert_eq!(rig.camera.target, Vector3::zero());

        rig.handle_device_event(&button(ElementState::Released));
        assert!(!rig.handle_device_event(&motion(10.0, 5.0)));
        assert!((rig.camera.yaw + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_shift_drag_pans() {
        let mut rig = manager();
        rig.set_modifiers(ModifiersState::SHIFT);
        rig.handle_device_event(&button(ElementState::Pressed));

        // Releasing Shift mid-drag keeps panning
        rig.set_modifiers(ModifiersState::empty());
        assert!(rig.handle_device_event(&motion(-10.0, 0.0)));

        assert_eq!(rig.camera.yaw, 0.0);
        assert!(rig.camera.target.x > 0.0);
    }

    #[test]
    fn test_wheel_zooms_in_on_positive_lines() {
        let mut rig = manager();
        let before = rig.camera.distance;
        let wheel = DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, 1.0),
        };
        assert!(rig.handle_device_event(&wheel));
        assert!(rig.camera.distance < before);
    }

    #[test]
    fn test_reset_needs_shift() {
        let mut rig = manager();
        rig.camera.set_distance(9.0);
        let key_c = PhysicalKey::Code(KeyCode::KeyC);

        assert!(!rig.handle_key(key_c, ElementState::Pressed));
        assert_eq!(rig.camera.distance, 9.0);

        rig.set_modifiers(ModifiersState::SHIFT);
        assert!(!rig.handle_key(key_c, ElementState::Released));
        assert!(rig.handle_key(key_c, ElementState::Pressed));
        assert_eq!(rig.camera.distance, 5.0);
    }
}
