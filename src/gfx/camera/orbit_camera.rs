use cgmath::*;

use crate::gfx::picking::AABB;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective camera orbiting a target point, Y-up
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    home: OrbitPose,
}

/// Orbit parameters restored by [`OrbitCamera::reset_to_default`]
#[derive(Debug, Clone, Copy)]
struct OrbitPose {
    distance: f32,
    pitch: f32,
    yaw: f32,
    target: Vector3<f32>,
}

/// Camera data as the shaders see it
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// Eye position, w = 1 to keep the 16 byte alignment
    pub view_position: [f32; 4],
    /// View-projection with wgpu clip depth (0..1)
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Recomputed by `update()`
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: cgmath::Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
            home: OrbitPose {
                distance,
                pitch,
                yaw,
                target,
            },
        };
        camera.update();
        camera
    }

    /// View-projection for rendering, wgpu clip depth (0..1)
    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.build_gl_view_projection_matrix()
    }

    /// View-projection with OpenGL clip depth (-1..1), the convention used for unprojecting
    /// pointer rays
    pub fn build_gl_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj = perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// Returns to the pose the camera was created with (or last framed)
    pub fn reset_to_default(&mut self) {
        self.distance = self.home.distance;
        self.pitch = self.home.pitch;
        self.yaw = self.home.yaw;
        self.target = self.home.target;
        self.update();
    }

    /// Re-targets the camera on `bounds` and backs off until the box fits the view
    ///
    /// The framed pose becomes the new reset pose.
    pub fn frame_bounds(&mut self, bounds: &AABB) {
        let center = (bounds.min + bounds.max) * 0.5;
        let radius = ((bounds.max - bounds.min) * 0.5).magnitude().max(0.5);
        let half_fov = self.fovy.0 * 0.5;
        let fit_distance = radius / half_fov.sin() * 1.1;

        self.target = center;
        if let Some(max) = self.bounds.max_distance {
            self.bounds.max_distance = Some(max.max(fit_distance * 2.0));
        }
        self.set_distance(fit_distance);

        self.home = OrbitPose {
            distance: self.distance,
            pitch: self.pitch,
            yaw: self.yaw,
            target: self.target,
        };
    }

    /// Sets the orbit radius within the distance bounds
    ///
    /// An inverted pair of bounds resolves to the minimum.
    pub fn set_distance(&mut self, distance: f32) {
        let min = self.bounds.min_distance.unwrap_or(f32::EPSILON);
        let max = self.bounds.max_distance.unwrap_or(f32::MAX).max(min);
        self.distance = distance.clamp(min, max);
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.0 + f32::EPSILON)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale by distance so panning feels the same at every zoom level
        let pan_scale = self.distance * 0.1;

        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;
        self.eye += movement;
        self.target += movement;
    }

    /// Updates the camera after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = self.build_view_projection_matrix().into();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: None,
            max_distance: Some(64.0),
            min_pitch: -std::f32::consts::PI / 2.0 + f32::EPSILON,
            max_pitch: std::f32::consts::PI / 2.0 - f32::EPSILON,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eye_sits_on_positive_z_at_zero_angles() {
        let camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::new(0.0, 1.0, 0.0), 1.0);
        assert!((camera.eye - Vector3::new(0.0, 1.0, 5.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_distance_is_clamped_to_bounds() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.bounds.min_distance = Some(1.0);
        camera.set_distance(0.1);
        assert_eq!(camera.distance, 1.0);
        camera.set_distance(1000.0);
        assert_eq!(camera.distance, 64.0);
    }

    #[test]
    fn test_inverted_distance_bounds_do_not_panic() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.bounds.min_distance = Some(10.0);
        camera.bounds.max_distance = Some(5.0);

        camera.set_distance(7.0);
        assert_eq!(camera.distance, 10.0);
        camera.add_distance(-3.0);
        assert_eq!(camera.distance, 10.0);

        let bounds = AABB::new(Vector3::new(-1.0, 0.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        camera.frame_bounds(&bounds);
        assert!(camera.distance >= 10.0);
    }

    #[test]
    fn test_uniform_carries_eye_and_wgpu_matrix() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.update_view_proj();

        assert_eq!(camera.uniform.view_position, [camera.eye.x, camera.eye.y, camera.eye.z, 1.0]);
        let expected: [[f32; 4]; 4] = camera.build_view_projection_matrix().into();
        assert_eq!(camera.uniform.view_proj, expected);
    }

    #[test]
    fn test_reset_restores_framed_pose() {
        let mut camera = OrbitCamera::new(5.0, 0.2, 0.0, Vector3::zero(), 1.0);
        let bounds = AABB::new(Vector3::new(-4.0, 0.0, -1.0), Vector3::new(4.0, 1.0, 1.0));
        camera.frame_bounds(&bounds);
        let framed = camera.distance;
        assert_eq!(camera.target, Vector3::new(0.0, 0.5, 0.0));
        assert!(framed > 5.0);

        camera.add_yaw(1.0);
        camera.set_distance(2.0);
        camera.reset_to_default();
        assert_eq!(camera.distance, framed);
        assert_eq!(camera.yaw, 0.0);
    }
}
