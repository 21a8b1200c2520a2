use cgmath::*;

use super::camera_utils::{Camera, CameraUniform};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Fixed-orientation perspective camera
///
/// The camera always looks along `direction` (down −Z by default); moving it
/// only translates the eye, the view is never re-aimed.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub eye: Vector3<f32>,
    pub direction: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for PerspectiveCamera {
    fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(Point3::from_vec(self.eye), self.direction, self.up)
    }

    fn build_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

impl PerspectiveCamera {
    pub fn new(eye: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            eye,
            direction: -Vector3::unit_z(),
            up: Vector3::unit_y(),
            aspect,
            fovy: Deg(45.0).into(),
            znear: 0.1,
            zfar: 100.0,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    pub fn set_eye(&mut self, eye: Vector3<f32>) {
        self.eye = eye;
    }

    /// Tracks the viewport; zero-sized (minimised) windows are ignored
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        let view = self.build_view_matrix();
        // Rows of the view rotation are the camera axes in world space
        let right = Vector3::new(view.x.x, view.y.x, view.z.x);
        let up = Vector3::new(view.x.y, view.y.y, view.z.y);

        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = (self.build_projection_matrix() * view).into();
        self.uniform.camera_right = right.extend(0.0).into();
        self.uniform.camera_up = up.extend(0.0).into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_view_axes_match_world_axes() {
        let camera = PerspectiveCamera::new(Vector3::new(0.0, 2.5, 5.0), 16.0 / 9.0);
        assert_relative_eq!(camera.uniform.camera_right[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.uniform.camera_up[1], 1.0, epsilon = 1e-6);
        assert_eq!(camera.uniform.view_position, [0.0, 2.5, 5.0, 1.0]);
    }

    #[test]
    fn point_ahead_of_camera_lands_in_clip_volume() {
        let camera = PerspectiveCamera::new(Vector3::new(0.0, 2.5, 5.0), 1.0);
        let clip = camera.build_view_projection_matrix() * Vector4::new(0.0, 2.5, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn zero_sized_resize_keeps_aspect() {
        let mut camera = PerspectiveCamera::new(Vector3::zero(), 1.5);
        camera.resize_projection(0, 720);
        assert_eq!(camera.aspect, 1.5);
        camera.resize_projection(800, 400);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn moving_the_eye_keeps_the_direction() {
        let mut camera = PerspectiveCamera::new(Vector3::new(0.0, 2.5, 5.0), 1.0);
        camera.set_eye(Vector3::new(2.0, 3.0, 5.0));
        camera.update_view_proj();
        assert_eq!(camera.direction, -Vector3::unit_z());
        assert_eq!(camera.uniform.view_position, [2.0, 3.0, 5.0, 1.0]);
    }
}
