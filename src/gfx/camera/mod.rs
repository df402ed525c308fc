pub mod camera_controller;
pub mod orbit_camera;

pub use camera_controller::{CameraController, CameraManager};
pub use orbit_camera::{CameraUniform, OrbitCamera};
