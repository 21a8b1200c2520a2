//! Material system
//!
//! Materials are stored once in a [`MaterialManager`] and objects reference
//! them by ID. Each material owns a small uniform buffer bound at group 2 of
//! the scene pipeline.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

pub const DEFAULT_MATERIAL_ID: &str = "default";

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    /// 1.0 when only received shadow is drawn (see [`Material::shadow_only`])
    pub shadow_only: f32,
    _padding: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Layout shared by every material bind group
pub fn material_bind_group_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform())
        .create(device, "Material Bind Group Layout")
}

struct MaterialGpu {
    ubo: MaterialUBO,
    bind_group: wgpu::BindGroup,
}

/// Surface properties of an object
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub shadow_only: bool,
    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(DEFAULT_MATERIAL_ID, [0.8, 0.8, 0.8, 1.0], 0.0, 0.5)
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("name", &self.name)
            .field("base_color", &self.base_color)
            .field("metallic", &self.metallic)
            .field("roughness", &self.roughness)
            .field("shadow_only", &self.shadow_only)
            .field("uploaded", &self.gpu.is_some())
            .finish()
    }
}

impl Material {
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - RGBA base color
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            shadow_only: false,
            gpu: None,
        }
    }

    /// Material that draws nothing but the shadows falling on it
    ///
    /// `opacity` is how dark a fully shadowed texel gets.
    pub fn shadow_catcher(name: &str, opacity: f32) -> Self {
        Self {
            shadow_only: true,
            ..Self::new(name, [0.0, 0.0, 0.0, opacity.clamp(0.0, 1.0)], 0.0, 1.0)
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            metallic: self.metallic,
            roughness: self.roughness,
            shadow_only: if self.shadow_only { 1.0 } else { 0.0 },
            _padding: 0.0,
        }
    }

    /// Creates the uniform buffer on first use, then keeps it in sync
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        let uniform = self.uniform();
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
            return;
        }

        let ubo = MaterialUBO::new(device, uniform);
        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .create(device, &format!("Material '{}'", self.name));
        self.gpu = Some(MaterialGpu { ubo, bind_group });
    }

    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

/// Centralised material storage with a guaranteed default entry
#[derive(Debug)]
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    pub fn new() -> Self {
        let mut materials = HashMap::new();
        materials.insert(DEFAULT_MATERIAL_ID.to_string(), Material::default());
        Self { materials }
    }

    /// Adds or replaces a material under its own name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn get_default_material(&self) -> &Material {
        // The default entry is inserted in `new` and never removed
        &self.materials[DEFAULT_MATERIAL_ID]
    }

    /// Material for an object, falling back to the default
    pub fn get_material_for_object(&self, material_id: Option<&str>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or_else(|| self.get_default_material())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_or_missing_ids_fall_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("frosting", [1.0, 0.9, 0.9, 1.0], 0.0, 0.8));

        assert_eq!(manager.get_material_for_object(Some("frosting")).name, "frosting");
        assert_eq!(manager.get_material_for_object(Some("nope")).name, DEFAULT_MATERIAL_ID);
        assert_eq!(manager.get_material_for_object(None).name, DEFAULT_MATERIAL_ID);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn shadow_catcher_uniform_flags_and_opacity() {
        let uniform = Material::shadow_catcher("floor", 0.15).uniform();
        assert_eq!(uniform.shadow_only, 1.0);
        assert_eq!(uniform.base_color[3], 0.15);
        assert_eq!(Material::default().uniform().shadow_only, 0.0);
    }

    #[test]
    fn factors_are_clamped() {
        let material = Material::new("x", [1.0; 4], 2.0, -1.0).with_alpha(3.0);
        assert_eq!(material.metallic, 1.0);
        assert_eq!(material.roughness, 0.0);
        assert_eq!(material.base_color[3], 1.0);
        assert_eq!(std::mem::size_of::<MaterialUniform>() % 16, 0);
    }
}
