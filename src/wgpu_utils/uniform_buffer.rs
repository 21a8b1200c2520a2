// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// Typed uniform buffer that skips writes when the content is unchanged
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

/// Last path segment of a type name, used as the buffer label
fn short_type_name<T>() -> &'static str {
    let type_name = std::any::type_name::<T>();
    type_name
        .rsplit_once("::")
        .map_or(type_name, |(_, name)| name)
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Creates the buffer already holding `initial`
    pub fn new(device: &wgpu::Device, initial: Content) -> Self {
        let bytes = bytemuck::bytes_of(&initial);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("UniformBuffer: {}", short_type_name::<Content>())),
            contents: bytes,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: bytes.to_vec(),
        }
    }

    /// Writes `content` to the GPU unless it matches the last write
    ///
    /// Returns true when a write was queued.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) -> bool {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content.clear();
        self.previous_content.extend_from_slice(new_content);
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_use_the_bare_type_name() {
        assert_eq!(short_type_name::<crate::gfx::resources::GlobalUniform>(), "GlobalUniform");
        assert_eq!(short_type_name::<f32>(), "f32");
    }
}
