//! Bind group layouts and render pipelines for the scene shader.

use crate::texture::Texture;
use crate::vertex::Vertex;

/// Shading model selected per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Lighting interpolated across each triangle.
    Smooth,
    /// One lighting value per triangle, taken from its first vertex.
    Flat,
}

impl Shading {
    pub fn toggled(self) -> Self {
        match self {
            Shading::Smooth => Shading::Flat,
            Shading::Flat => Shading::Smooth,
        }
    }

    fn entry_points(self) -> (&'static str, &'static str) {
        match self {
            Shading::Smooth => ("vs_smooth", "fs_smooth"),
            Shading::Flat => ("vs_flat", "fs_flat"),
        }
    }
}

/// Group 0: per-frame scene uniform.
pub fn create_scene_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Scene Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Group 1: diffuse texture and sampler.
pub fn create_texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Texture Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Group 2: per-draw uniform (model matrix, color, flags).
pub fn create_draw_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Draw Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// One pipeline per shading model and depth-test setting.
pub struct PipelineSet {
    smooth_depth: wgpu::RenderPipeline,
    smooth_no_depth: wgpu::RenderPipeline,
    flat_depth: wgpu::RenderPipeline,
    flat_no_depth: wgpu::RenderPipeline,
}

impl PipelineSet {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        let build = |shading, depth_test| {
            create_scene_pipeline(device, &layout, &shader, color_format, shading, depth_test)
        };
        Self {
            smooth_depth: build(Shading::Smooth, true),
            smooth_no_depth: build(Shading::Smooth, false),
            flat_depth: build(Shading::Flat, true),
            flat_no_depth: build(Shading::Flat, false),
        }
    }

    pub fn get(&self, shading: Shading, depth_test: bool) -> &wgpu::RenderPipeline {
        match (shading, depth_test) {
            (Shading::Smooth, true) => &self.smooth_depth,
            (Shading::Smooth, false) => &self.smooth_no_depth,
            (Shading::Flat, true) => &self.flat_depth,
            (Shading::Flat, false) => &self.flat_no_depth,
        }
    }
}

/// Triangle-list pipeline, no culling. With depth testing off the depth
/// attachment stays bound but is neither tested nor written.
pub fn create_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    shading: Shading,
    depth_test: bool,
) -> wgpu::RenderPipeline {
    let (vs_entry, fs_entry) = shading.entry_points();
    let label = format!("Scene Pipeline ({:?}, depth {})", shading, if depth_test { "on" } else { "off" });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: depth_test,
            depth_compare: if depth_test {
                wgpu::CompareFunction::Less
            } else {
                wgpu::CompareFunction::Always
            },
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shading_toggles_back_and_forth() {
        assert_eq!(Shading::Smooth.toggled(), Shading::Flat);
        assert_eq!(Shading::Smooth.toggled().toggled(), Shading::Smooth);
    }
}
