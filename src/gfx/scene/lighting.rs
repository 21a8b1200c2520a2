//! Scene lights
//!
//! One ambient term, one shadow-casting spot light and a small fixed pool of
//! point lights.

use cgmath::{perspective, InnerSpace, Matrix4, Point3, Rad, Vector3};

use crate::gfx::camera::perspective_camera::OPENGL_TO_WGPU_MATRIX;

/// Point lights the scene shader can take in one frame
pub const MAX_POINT_LIGHTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Cone light that renders the scene's shadow map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Half-angle of the cone
    pub angle: f32,
    /// Fraction of the cone over which light fades out at the edge
    pub penumbra: f32,
    pub cast_shadow: bool,
    pub shadow_near: f32,
    pub shadow_far: f32,
}

impl SpotLight {
    pub fn direction(&self) -> Vector3<f32> {
        (self.target - self.position).normalize()
    }

    /// Cosine of the outer cone edge
    pub fn outer_cos(&self) -> f32 {
        self.angle.cos()
    }

    /// Cosine of the inner edge where the penumbra starts
    pub fn inner_cos(&self) -> f32 {
        (self.angle * (1.0 - self.penumbra.clamp(0.0, 1.0))).cos()
    }

    /// View-projection of the light, used to render and sample the shadow map
    pub fn view_projection(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.position.x, self.position.y, self.position.z);
        let target = Point3::new(self.target.x, self.target.y, self.target.z);
        let view = Matrix4::look_at_rh(eye, target, Vector3::unit_y());
        let proj = perspective(Rad(self.angle * 2.0), 1.0, self.shadow_near, self.shadow_far);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Distance at which the light has faded to nothing
    pub range: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub spot: SpotLight,
    point_lights: Vec<PointLight>,
}

impl Lighting {
    pub fn new(ambient: AmbientLight, spot: SpotLight) -> Self {
        Self {
            ambient,
            spot,
            point_lights: Vec::new(),
        }
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point_lights
    }

    /// Replaces the point lights with the first [`MAX_POINT_LIGHTS`] given
    ///
    /// Order is kept so the same lights survive from frame to frame. Returns
    /// how many did not fit.
    pub fn set_point_lights(&mut self, lights: impl IntoIterator<Item = PointLight>) -> usize {
        self.point_lights.clear();
        let mut dropped = 0;
        for light in lights {
            if self.point_lights.len() < MAX_POINT_LIGHTS {
                self.point_lights.push(light);
            } else {
                dropped += 1;
            }
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Vector4, Zero};

    fn spot() -> SpotLight {
        SpotLight {
            position: Vector3::new(5.0, 7.0, 5.0),
            target: Vector3::zero(),
            color: [1.0, 0.82, 0.5],
            intensity: 1.2,
            angle: std::f32::consts::PI / 6.0,
            penumbra: 0.3,
            cast_shadow: true,
            shadow_near: 0.5,
            shadow_far: 30.0,
        }
    }

    #[test]
    fn penumbra_puts_inner_edge_inside_cone() {
        let light = spot();
        assert!(light.inner_cos() > light.outer_cos());
        assert_relative_eq!(light.outer_cos(), (std::f32::consts::PI / 6.0).cos());
    }

    #[test]
    fn target_projects_to_shadow_map_centre() {
        let clip = spot().view_projection() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn point_lights_are_capped() {
        let mut lighting = Lighting::new(
            AmbientLight {
                color: [1.0; 3],
                intensity: 0.7,
            },
            spot(),
        );
        let light = PointLight {
            position: Vector3::zero(),
            color: [1.0; 3],
            intensity: 1.0,
            range: 3.0,
        };

        let dropped = lighting.set_point_lights(std::iter::repeat(light).take(MAX_POINT_LIGHTS + 3));
        assert_eq!(dropped, 3);
        assert_eq!(lighting.point_lights().len(), MAX_POINT_LIGHTS);

        assert_eq!(lighting.set_point_lights([light]), 0);
        assert_eq!(lighting.point_lights().len(), 1);
    }
}
