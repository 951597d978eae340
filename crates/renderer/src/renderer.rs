//! Main renderer managing wgpu state and the scene pass.

use crate::{
    camera::{DrawUniform, SceneUniform},
    error::RenderError,
    mesh::{Mesh, MeshData},
    pipeline::{
        create_draw_bind_group_layout, create_scene_bind_group_layout, create_texture_bind_group_layout,
        PipelineSet, Shading,
    },
    texture::Texture,
    vertex::Vertex,
};
use anyhow::Result;
use procgen::TextureData;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

/// Uniform buffer plus bind group for one draw.
struct DrawBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl DrawBinding {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Draw Uniform", label)),
            contents: bytemuck::cast_slice(&[DrawUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Draw Bind Group", label)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }
}

/// Per-draw uniforms for one frame: floor, lit solid, and its shadow.
#[derive(Debug, Clone, Copy)]
pub struct FrameDraws {
    pub floor: DrawUniform,
    pub solid: DrawUniform,
    pub shadow: DrawUniform,
}

/// Main renderer state.
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    pub window: Arc<Window>,

    pipelines: PipelineSet,

    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    floor_draw: DrawBinding,
    solid_draw: DrawBinding,
    shadow_draw: DrawBinding,

    depth_texture: Texture,

    floor_mesh: Mesh,
    solid_mesh: Mesh,
}

impl Renderer {
    /// Create a renderer for the window and upload the checkerboard texture,
    /// the floor, and the first tessellation of the solid. The solid's index
    /// buffer is fixed here; later frames only rewrite its vertices.
    pub async fn new(
        window: Arc<Window>,
        vsync: bool,
        texture: &TextureData,
        floor: &MeshData,
        solid: &MeshData,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        log::info!("Using GPU: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_layout = create_scene_bind_group_layout(&device);
        let texture_layout = create_texture_bind_group_layout(&device);
        let draw_layout = create_draw_bind_group_layout(&device);

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let diffuse = Texture::from_texture_data(&device, &queue, texture, "Checkerboard");
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Bind Group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
                },
            ],
        });

        let floor_draw = DrawBinding::new(&device, &draw_layout, "Floor");
        let solid_draw = DrawBinding::new(&device, &draw_layout, "Solid");
        let shadow_draw = DrawBinding::new(&device, &draw_layout, "Shadow");

        let pipelines = PipelineSet::new(&device, surface_format, &[&scene_layout, &texture_layout, &draw_layout]);

        let depth_texture = Texture::create_depth_texture(&device, config.width, config.height, "Depth Texture");

        let floor_mesh = floor.upload(&device, "Floor");
        let solid_mesh = Mesh::dynamic(&device, solid, "Solid");
        log::info!(
            "Uploaded solid: {} vertices, {} indices",
            solid_mesh.num_vertices,
            solid_mesh.num_indices
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            pipelines,
            scene_buffer,
            scene_bind_group,
            texture_bind_group,
            floor_draw,
            solid_draw,
            shadow_draw,
            depth_texture,
            floor_mesh,
            solid_mesh,
        })
    }

    /// Handle window resize.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                self.config.width,
                self.config.height,
                "Depth Texture",
            );
        }
    }

    /// Update the per-frame scene uniform.
    pub fn update_scene(&self, scene: &SceneUniform) {
        self.queue.write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[*scene]));
    }

    /// Replace the solid's vertices with this frame's tessellation.
    pub fn upload_solid(&self, vertices: &[Vertex]) -> Result<(), RenderError> {
        self.solid_mesh.write_vertices(&self.queue, vertices)
    }

    /// Clear to black and draw floor, solid, then shadow in one pass. A lost
    /// or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame(&mut self, draws: &FrameDraws, shading: Shading, depth_test: bool) -> Result<(), RenderError> {
        self.queue.write_buffer(&self.floor_draw.buffer, 0, bytemuck::cast_slice(&[draws.floor]));
        self.queue.write_buffer(&self.solid_draw.buffer, 0, bytemuck::cast_slice(&[draws.solid]));
        self.queue.write_buffer(&self.shadow_draw.buffer, 0, bytemuck::cast_slice(&[draws.shadow]));

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.resize(self.size);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
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
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(self.pipelines.get(shading, depth_test));
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            render_pass.set_bind_group(1, &self.texture_bind_group, &[]);

            render_pass.set_bind_group(2, &self.floor_draw.bind_group, &[]);
            self.floor_mesh.draw(&mut render_pass);

            self.draw_patch_set(&mut render_pass, &self.solid_draw);
            self.draw_patch_set(&mut render_pass, &self.shadow_draw);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Draw the tessellated solid under one per-draw uniform. The lit pass and
    /// the shadow pass differ only in that uniform.
    fn draw_patch_set(&self, pass: &mut wgpu::RenderPass<'_>, draw: &DrawBinding) {
        pass.set_bind_group(2, &draw.bind_group, &[]);
        self.solid_mesh.draw(pass);
    }

    /// Get window dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}
