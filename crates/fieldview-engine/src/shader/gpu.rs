use std::num::NonZeroU64;

use crate::render::quad::QuadVertex;

use super::error::StageKind;
use super::link::{LinkedProgram, LinkedStage, Resource, ResourceKind};

/// GPU objects built from a [`LinkedProgram`].
///
/// Bind group layouts follow the reflected resources; group `i` of the
/// pipeline layout is `bind_group_layouts()[i]`.
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layouts: Vec<wgpu::BindGroupLayout>,
}

impl GpuProgram {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        program: &LinkedProgram,
    ) -> Self {
        let vertex_module = shader_module(device, program.vertex());
        let fragment_module = shader_module(device, program.fragment());

        let bind_group_layouts: Vec<wgpu::BindGroupLayout> = (0..program.group_count())
            .map(|group| {
                let entries: Vec<wgpu::BindGroupLayoutEntry> = program
                    .resources()
                    .iter()
                    .filter(|r| r.group == group)
                    .map(layout_entry)
                    .collect();

                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("fieldview program bgl"),
                    entries: &entries,
                })
            })
            .collect();

        let layout_refs: Vec<&wgpu::BindGroupLayout> = bind_group_layouts.iter().collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fieldview program pipeline layout"),
            bind_group_layouts: &layout_refs,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fieldview program pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(&program.vertex().entry_point),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(&program.fragment().entry_point),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layouts,
        }
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group_layouts(&self) -> &[wgpu::BindGroupLayout] {
        &self.bind_group_layouts
    }
}

fn shader_module(device: &wgpu::Device, stage: &LinkedStage) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage.kind {
            StageKind::Vertex => "fieldview vertex shader",
            StageKind::Fragment => "fieldview fragment shader",
        }),
        source: wgpu::ShaderSource::Wgsl(stage.source.as_str().into()),
    })
}

fn layout_entry(resource: &Resource) -> wgpu::BindGroupLayoutEntry {
    let ty = match resource.kind {
        ResourceKind::UniformBlock { size, .. } => wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size),
        },
        ResourceKind::Texture => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        ResourceKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
    };

    wgpu::BindGroupLayoutEntry {
        binding: resource.binding,
        visibility: resource.visibility,
        ty,
        count: None,
    }
}
