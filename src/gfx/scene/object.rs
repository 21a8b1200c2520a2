use std::ops::Range;

use cgmath::{Matrix, Matrix4, Quaternion, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;
use wgpu::Device;

use crate::gfx::geometry::GeometryData;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

use super::vertex::Vertex3D;

pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    /// Builds a mesh from flat `[x, y, z, ...]` position and normal arrays
    pub fn new(positions: &[f32], normals: &[f32], indices: Vec<u32>) -> Self {
        let vertices = positions
            .chunks_exact(3)
            .enumerate()
            .map(|(i, p)| Vertex3D {
                position: [p[0], p[1], p[2]],
                normal: normals
                    .get(i * 3..i * 3 + 3)
                    .map_or([0.0, 1.0, 0.0], |n| [n[0], n[1], n[2]]),
            })
            .collect();

        Self::from_vertices(vertices, indices)
    }

    pub fn from_geometry(geometry: &GeometryData) -> Self {
        Self::from_vertices(geometry.to_vertices(), geometry.indices.clone())
    }

    fn from_vertices(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        Self {
            index_count: indices.len() as u32,
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }

    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    fn upload(&mut self, device: &Device, label: &str) {
        self.vertex_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// Per-object uniform bound at group 1
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of `model`, for normals under non-uniform scale
    pub normal: [[f32; 4]; 4],
    /// x = 1 when the object receives shadows
    pub flags: [f32; 4],
}

/// Layout shared by every object's transform bind group
pub fn object_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_rendering(binding_types::uniform())
        .create(device, "Object Bind Group Layout")
}

pub struct ObjectGpuResources {
    uniform: UniformBuffer<ObjectUniform>,
    bind_group: wgpu::BindGroup,
}

/// Scene graph node: one or more meshes sharing a transform and material
pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
    pub material_id: Option<String>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub visible: bool,
    gpu_resources: Option<ObjectGpuResources>,
}

impl Object {
    /// Create a new Object at the origin with unit scale
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.into(),
            meshes,
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            material_id: None,
            cast_shadow: false,
            receive_shadow: false,
            visible: true,
            gpu_resources: None,
        }
    }

    pub fn with_material(mut self, material_id: &str) -> Self {
        self.material_id = Some(material_id.to_string());
        self
    }

    pub fn with_translation(mut self, translation: Vector3<f32>) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3::new(scale, scale, scale);
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn get_material_id(&self) -> Option<&str> {
        self.material_id.as_deref()
    }

    /// Translation × rotation × scale
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn uniform(&self) -> ObjectUniform {
        let model = self.model_matrix();
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);

        ObjectUniform {
            model: model.into(),
            normal: normal.into(),
            flags: [if self.receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu_resources.is_some()
    }

    /// Uploads meshes and creates the transform uniform
    pub fn init_gpu_resources(&mut self, device: &Device, layout: &BindGroupLayoutWithDesc) {
        for mesh in &mut self.meshes {
            mesh.upload(device, &self.name);
        }

        let uniform = UniformBuffer::new(device, self.uniform());
        let bind_group = BindGroupBuilder::new(layout)
            .resource(uniform.binding_resource())
            .create(device, &format!("{} Transform", self.name));

        log::debug!(
            "Uploaded '{}': {} mesh(es), {} triangle(s)",
            self.name,
            self.meshes.len(),
            self.meshes.iter().map(Mesh::triangle_count).sum::<u32>()
        );
        self.gpu_resources = Some(ObjectGpuResources {
            uniform,
            bind_group,
        });
    }

    /// Syncs the transform to the GPU if resources exist
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        let uniform = self.uniform();
        if let Some(gpu_resources) = &mut self.gpu_resources {
            gpu_resources.uniform.update_content(queue, uniform);
        }
    }

    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|res| &res.bind_group)
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a Object);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let (Some(vertex_buffer), Some(index_buffer)) = (&mesh.vertex_buffer, &mesh.index_buffer)
        else {
            return;
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    /// Binds the object's transform at group 1 and draws all its meshes
    fn draw_object(&mut self, object: &'b Object) {
        let Some(transform) = object.get_transform_bind_group() else {
            return;
        };
        self.set_bind_group(1, transform, &[]);
        for mesh in &object.meshes {
            self.draw_mesh(mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Rotation3, Vector4};

    fn triangle() -> Mesh {
        Mesh::new(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            &[0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 2, 1],
        )
    }

    #[test]
    fn mesh_interleaves_positions_and_normals() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 1.0, 0.0]);
        assert!(!mesh.is_uploaded());
    }

    #[test]
    fn model_matrix_scales_then_translates() {
        let mut object = Object::new("cake", vec![triangle()])
            .with_translation(Vector3::new(1.0, 0.0, 0.0))
            .with_uniform_scale(1.5);
        object.scale.y = 0.7;

        let p = object.model_matrix() * Vector4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(p, Vector4::new(2.5, 0.7, 1.5, 1.0));
    }

    #[test]
    fn rotation_applies_before_translation() {
        let mut object = Object::new("balloon", Vec::new())
            .with_translation(Vector3::new(0.0, 1.0, 0.0));
        object.rotation = Quaternion::from_angle_y(cgmath::Deg(90.0));

        let p = object.model_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 0.0).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
        assert!((p.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_carries_shadow_flag() {
        let object = Object::new("floor", Vec::new()).with_shadows(false, true);
        let uniform = object.uniform();
        assert_eq!(uniform.flags[0], 1.0);
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        assert_eq!(uniform.model, identity);
        assert!(!object.has_gpu_resources());
    }
}
