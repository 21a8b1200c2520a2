//! Instanced billboard rendering for the confetti cloud
//!
//! Every particle is one instance of a camera-facing quad. The quad corners
//! come from `vertex_index` in the shader, so the only vertex buffer is the
//! per-instance one and the whole cloud is a single draw call.

use bytemuck::{Pod, Zeroable};
use cgmath::Vector3;
use wgpu::{Buffer, Device, Queue, RenderPass};

/// Instance data for one confetti quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ConfettiInstance {
    /// World position [x, y, z, size]
    pub position_size: [f32; 4],
    /// Color [r, g, b, opacity]
    pub color: [f32; 4],
}

impl ConfettiInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];

    pub fn new(position: Vector3<f32>, size: f32, color: [f32; 3], opacity: f32) -> Self {
        Self {
            position_size: [position.x, position.y, position.z, size],
            color: [color[0], color[1], color[2], opacity],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ConfettiInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertices per quad (two triangles, no index buffer)
const QUAD_VERTICES: u32 = 6;

pub struct ConfettiRenderer {
    instance_buffer: Buffer,
    max_instances: u32,
    current_instance_count: u32,
}

impl ConfettiRenderer {
    pub fn new(device: &Device, max_instances: u32) -> Self {
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Confetti Instance Buffer"),
            size: u64::from(max_instances) * std::mem::size_of::<ConfettiInstance>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            instance_buffer,
            max_instances,
            current_instance_count: 0,
        }
    }

    /// Uploads this frame's particles; anything past capacity is dropped
    pub fn update(&mut self, queue: &Queue, instances: &[ConfettiInstance]) {
        let count = instances.len().min(self.max_instances as usize);
        if count < instances.len() {
            log::warn!(
                "{} confetti instance(s) over capacity {} dropped",
                instances.len() - count,
                self.max_instances
            );
        }

        self.current_instance_count = count as u32;
        if count > 0 {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances[..count]),
            );
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.current_instance_count
    }

    /// Draws with whatever pipeline and group 0 the caller has bound
    pub fn render(&self, render_pass: &mut RenderPass<'_>) {
        if self.current_instance_count == 0 {
            return;
        }

        render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        render_pass.draw(0..QUAD_VERTICES, 0..self.current_instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_packs_size_and_opacity() {
        let instance = ConfettiInstance::new(Vector3::new(1.0, 2.0, 3.0), 0.1, [1.0, 0.5, 0.0], 0.25);
        assert_eq!(instance.position_size, [1.0, 2.0, 3.0, 0.1]);
        assert_eq!(instance.color, [1.0, 0.5, 0.0, 0.25]);
        assert_eq!(ConfettiInstance::desc().array_stride, 32);
        assert_eq!(ConfettiInstance::desc().step_mode, wgpu::VertexStepMode::Instance);
    }
}
