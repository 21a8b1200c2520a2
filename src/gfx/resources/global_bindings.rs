//! Global uniform bindings for camera and lighting
//!
//! Everything every draw call needs lives in one uniform block bound at
//! group 0: camera matrices, the billboard axes, and all scene lights.

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        scene::lighting::{Lighting, MAX_POINT_LIGHTS},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform block
///
/// MUST match `Globals` in the WGSL shaders. Only `vec4` / `mat4` sized
/// members so the Rust and WGSL layouts agree without manual padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    /// rgb = colour × intensity
    pub ambient: [f32; 4],
    /// xyz = position, w = intensity
    pub spot_position: [f32; 4],
    /// xyz = normalised direction, w = cos of the outer cone
    pub spot_direction: [f32; 4],
    /// rgb = colour, w = cos of the inner cone
    pub spot_color: [f32; 4],
    pub light_view_proj: [[f32; 4]; 4],
    /// xyz = position, w = range
    pub point_positions: [[f32; 4]; MAX_POINT_LIGHTS],
    /// rgb = colour, w = intensity
    pub point_colors: [[f32; 4]; MAX_POINT_LIGHTS],
    /// x = active point lights, y = 1 when the spot light casts shadows
    pub counts: [u32; 4],
}

impl GlobalUniform {
    pub fn new(camera: &CameraUniform, lighting: &Lighting) -> Self {
        let spot = &lighting.spot;
        let direction = spot.direction();
        let ambient = lighting.ambient;

        let mut point_positions = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut point_colors = [[0.0; 4]; MAX_POINT_LIGHTS];
        for (i, light) in lighting.point_lights().iter().enumerate() {
            point_positions[i] = [light.position.x, light.position.y, light.position.z, light.range];
            point_colors[i] = [light.color[0], light.color[1], light.color[2], light.intensity];
        }

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            camera_right: camera.camera_right,
            camera_up: camera.camera_up,
            ambient: [
                ambient.color[0] * ambient.intensity,
                ambient.color[1] * ambient.intensity,
                ambient.color[2] * ambient.intensity,
                1.0,
            ],
            spot_position: [spot.position.x, spot.position.y, spot.position.z, spot.intensity],
            spot_direction: [direction.x, direction.y, direction.z, spot.outer_cos()],
            spot_color: [spot.color[0], spot.color[1], spot.color[2], spot.inner_cos()],
            light_view_proj: spot.view_projection().into(),
            point_positions,
            point_colors,
            counts: [
                lighting.point_lights().len() as u32,
                u32::from(spot.cast_shadow),
                0,
                0,
            ],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Layout and bind group for group 0
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::lighting::{AmbientLight, PointLight, SpotLight};
    use cgmath::{Vector3, Zero};

    fn lighting() -> Lighting {
        Lighting::new(
            AmbientLight {
                color: [1.0, 1.0, 1.0],
                intensity: 0.7,
            },
            SpotLight {
                position: Vector3::new(5.0, 7.0, 5.0),
                target: Vector3::zero(),
                color: [1.0, 0.8, 0.5],
                intensity: 1.2,
                angle: std::f32::consts::PI / 6.0,
                penumbra: 0.3,
                cast_shadow: true,
                shadow_near: 0.5,
                shadow_far: 30.0,
            },
        )
    }

    #[test]
    fn layout_is_std140_friendly() {
        let size = std::mem::size_of::<GlobalUniform>();
        assert_eq!(size % 16, 0);
        assert_eq!(size, 16 * 7 + 64 * 2 + 16 * MAX_POINT_LIGHTS * 2 + 16);
    }

    #[test]
    fn packs_point_lights_and_counts() {
        let mut lighting = lighting();
        lighting.set_point_lights([PointLight {
            position: Vector3::new(0.1, 1.2, 0.3),
            color: [1.0, 0.93, 0.67],
            intensity: 0.9,
            range: 3.0,
        }]);

        let uniform = GlobalUniform::new(&CameraUniform::default(), &lighting);
        assert_eq!(uniform.counts[0], 1);
        assert_eq!(uniform.counts[1], 1);
        assert_eq!(uniform.point_positions[0], [0.1, 1.2, 0.3, 3.0]);
        assert_eq!(uniform.point_colors[0][3], 0.9);
        assert_eq!(uniform.point_colors[1], [0.0; 4]);
        assert_eq!(uniform.spot_position[3], 1.2);
        assert!((uniform.ambient[0] - 0.7).abs() < 1e-6);
    }
}
