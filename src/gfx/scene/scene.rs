use wgpu::Device;

use crate::gfx::{
    camera::perspective_camera::PerspectiveCamera,
    resources::material::{Material, MaterialManager},
};
use crate::wgpu_utils::binding_builder::BindGroupLayoutWithDesc;

use super::lighting::Lighting;
use super::object::Object;

/// Everything that gets drawn: camera, lights, objects and their materials
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub lighting: Lighting,
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager,
    /// Clear colour, linear RGB
    pub background: [f32; 3],
}

impl Scene {
    pub fn new(camera: PerspectiveCamera, lighting: Lighting, background: [f32; 3]) -> Self {
        Self {
            camera,
            lighting,
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
            background,
        }
    }

    /// Updates the camera matrices
    pub fn update(&mut self) {
        self.camera.update_view_proj();
    }

    /// Adds an object and returns its index
    pub fn add_object(&mut self, object: Object) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    pub fn get_object_mut(&mut self, index: usize) -> Option<&mut Object> {
        self.objects.get_mut(index)
    }

    pub fn find_object(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|obj| obj.name == name)
    }

    /// Material assigned to the object, or the default one
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    /// Creates GPU resources for anything added since the last call and
    /// syncs transforms and materials
    ///
    /// Objects can arrive after the GPU is up (the cake loads late), so this
    /// runs every frame.
    pub fn sync_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        object_layout: &BindGroupLayoutWithDesc,
        material_layout: &BindGroupLayoutWithDesc,
    ) {
        for object in &mut self.objects {
            if object.has_gpu_resources() {
                object.update_transform(queue);
            } else {
                object.init_gpu_resources(device, object_layout);
            }
        }

        self.material_manager
            .update_all_gpu_resources(device, queue, material_layout);
    }

    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            material_count: self.material_manager.len(),
            total_triangles: self
                .objects
                .iter()
                .flat_map(|obj| obj.meshes.iter())
                .map(|m| m.triangle_count())
                .sum(),
            total_vertices: self
                .objects
                .iter()
                .flat_map(|obj| obj.meshes.iter())
                .map(|m| m.vertex_count())
                .sum(),
        }
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_vertices: usize,
}
