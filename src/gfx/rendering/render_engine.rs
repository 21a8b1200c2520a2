//! WGPU-based rendering engine
//!
//! Owns the surface, device and every GPU resource that is not tied to a
//! single object. A frame is three passes: the spot light's shadow map, the
//! lit scene with the confetti on top, and the optional UI overlay.

use std::sync::Arc;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    resources::{
        global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform},
        material::material_bind_group_layout,
        texture_resource::TextureResource,
    },
    scene::{
        object::{object_bind_group_layout, DrawObject},
        scene::Scene,
    },
};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

use super::confetti_renderer::{ConfettiInstance, ConfettiRenderer};
use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SHADOW_PIPELINE: &str = "Shadow";
const SCENE_PIPELINE: &str = "Scene";
const CONFETTI_PIPELINE: &str = "Confetti";

/// Upper bound on confetti instances uploaded per frame
pub const MAX_CONFETTI_INSTANCES: u32 = 1024;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("cannot create render surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("cannot open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("pipeline creation failed: {}", .0.join("; "))]
    Pipelines(Vec<String>),

    #[error("cannot acquire frame: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// What the main pass draws under the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameContent {
    /// Shadows, lit objects and confetti
    Scene,
    /// Background colour only, while there is no model to show
    Backdrop,
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: TextureResource,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,

    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,

    confetti: ConfettiRenderer,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    ///
    /// # Errors
    /// Any failure to get a surface, adapter, device or pipeline. None of
    /// these are retried.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        let present_mode = if surface_capabilities
            .present_modes
            .contains(&wgpu::PresentMode::Immediate)
        {
            wgpu::PresentMode::Immediate
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");
        let shadow_map =
            TextureResource::create_shadow_map(&device, TextureResource::SHADOW_MAP_SIZE);

        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::depth_texture_2d())
            .next_binding_fragment(binding_types::comparison_sampler())
            .create(&device, "Shadow Bind Group Layout");
        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .texture(&shadow_map.view)
            .sampler(&shadow_map.sampler)
            .create(&device, "Shadow Bind Group");

        let global_ubo = GlobalUBO::new(&device, bytemuck::Zeroable::zeroed());
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let object_layout = object_bind_group_layout(&device);
        let material_layout = material_bind_group_layout(&device);

        let confetti = ConfettiRenderer::new(&device, MAX_CONFETTI_INSTANCES);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("scene", include_str!("shaders/scene.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shaders/shadow.wgsl"));
        pipeline_manager.load_shader("confetti", include_str!("shaders/confetti.wgsl"));

        // Both faces go into the shadow map so thin parts still cast
        pipeline_manager.register_pipeline(
            SHADOW_PIPELINE,
            PipelineConfig::default()
                .with_label("SHADOW")
                .with_shader("shadow")
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_depth_bias(wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                })
                .with_cull_mode(None)
                .with_vertex_only()
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            SCENE_PIPELINE,
            PipelineConfig::default()
                .with_label("SCENE")
                .with_shader("scene")
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING))
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.layout.clone(),
                    material_layout.layout.clone(),
                    shadow_layout.layout.clone(),
                ]),
        );

        pipeline_manager.register_pipeline(
            CONFETTI_PIPELINE,
            PipelineConfig::default()
                .with_label("CONFETTI")
                .with_shader("confetti")
                .with_vertex_layouts(vec![ConfettiInstance::desc()])
                .with_cull_mode(None)
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_depth_read_only()
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING))
                .with_bind_group_layouts(vec![global_bindings.bind_group_layout().clone()]),
        );

        pipeline_manager
            .create_all_pipelines()
            .map_err(RenderError::Pipelines)?;
        log::info!("Render engine ready: {}x{} {:?}", config.width, config.height, format);

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            depth_texture,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            material_layout,
            shadow_map,
            shadow_bind_group,
            confetti,
        })
    }

    /// Syncs the scene and this frame's confetti to the GPU
    ///
    /// Must run before [`Self::render_frame`] every frame.
    pub fn update(&mut self, scene: &mut Scene, confetti: &[ConfettiInstance]) {
        scene.update();
        scene.sync_gpu_resources(
            &self.device,
            &self.queue,
            &self.object_layout,
            &self.material_layout,
        );
        self.global_ubo.update_content(
            &self.queue,
            GlobalUniform::new(&scene.camera.uniform, &scene.lighting),
        );
        self.confetti.update(&self.queue, confetti);
    }

    /// Renders a frame with an optional UI overlay
    ///
    /// A [`FrameContent::Backdrop`] frame clears to the scene background and
    /// runs only the UI pass. A lost or outdated surface is reconfigured and
    /// the frame is skipped without an error.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        content: FrameContent,
        ui_callback: Option<F>,
    ) -> Result<(), RenderError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let draw_scene = content == FrameContent::Scene;

        // PASS 1: spot light depth
        if draw_scene && scene.lighting.spot.cast_shadow {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(SHADOW_PIPELINE) {
                shadow_pass.set_pipeline(pipeline);
                shadow_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                for object in scene.objects.iter().filter(|o| o.visible && o.cast_shadow) {
                    shadow_pass.draw_object(object);
                }
            }
        }

        // PASS 2: lit scene, then confetti over it
        {
            let [r, g, b] = scene.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if draw_scene {
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                if let Some(pipeline) = self.pipeline_manager.get_pipeline(SCENE_PIPELINE) {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

                    for object in scene.objects.iter().filter(|o| o.visible) {
                        let material = scene.get_material_for_object(object);
                        match material.get_bind_group() {
                            Some(material_bind_group) => {
                                render_pass.set_bind_group(2, material_bind_group, &[]);
                                render_pass.draw_object(object);
                            }
                            None => log::trace!(
                                "Skipping '{}': material '{}' not uploaded",
                                object.name,
                                material.name
                            ),
                        }
                    }
                }

                if let Some(pipeline) = self.pipeline_manager.get_pipeline(CONFETTI_PIPELINE) {
                    render_pass.set_pipeline(pipeline);
                    self.confetti.render(&mut render_pass);
                }
            }
        }

        // PASS 3: UI overlay
        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer
    ///
    /// Zero-sized requests (minimised window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::debug!("Surface resized to {width}x{height}");
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
