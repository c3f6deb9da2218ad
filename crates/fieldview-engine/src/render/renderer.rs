use std::path::PathBuf;

use crate::camera::ViewState;
use crate::shader::{GpuProgram, LinkedProgram, ResourceKind, ShaderError, ShaderPaths, ShaderProgram};

use super::ctx::{RenderCtx, RenderTarget};
use super::quad::{FullscreenQuad, QUAD_INDEX_COUNT};
use super::textures::{self, Pixels, SlotTexture};
use super::uniforms::{BlockLayout, FrameValues, UniformBlock, CAMERA_BLOCK, CAMERA_BLOCK_MIN_SIZE, FRAME_BLOCK};

/// Everything derived from one linked program. Rebuilt on every reload.
struct PipelineState {
    bind_groups: Vec<wgpu::BindGroup>,
    blocks: Vec<UniformBlock>,
    _textures: Vec<SlotTexture>,
    gpu: GpuProgram,
}

/// Draws the shader program over the whole target.
///
/// Until a program has linked nothing is drawn. A failed reload keeps the
/// previous pipeline, blocks and textures.
pub struct FullscreenRenderer {
    // Dropped before the program it was built from.
    state: Option<PipelineState>,
    program: ShaderProgram,
    texture_paths: Vec<PathBuf>,

    quad: Option<FullscreenQuad>,
    sampler: Option<wgpu::Sampler>,
}

impl FullscreenRenderer {
    /// At most three texture paths are used, for `tex1`..`tex3`.
    pub fn new(texture_paths: Vec<PathBuf>) -> Self {
        if texture_paths.len() > textures::TEXTURE_SLOTS.len() {
            log::warn!(
                "{} texture paths given, only the first {} are used",
                texture_paths.len(),
                textures::TEXTURE_SLOTS.len()
            );
        }

        Self {
            state: None,
            program: ShaderProgram::new(),
            texture_paths,
            quad: None,
            sampler: None,
        }
    }

    /// Records `paths` and builds the first program from them.
    pub fn load(&mut self, ctx: &RenderCtx<'_>, paths: ShaderPaths) -> Result<(), ShaderError> {
        self.program.load(paths);
        self.reload(ctx)
    }

    /// Recompiles both stages from disk and, on success, rebuilds the pipeline,
    /// uniform blocks and textures. On failure the current state is kept.
    ///
    /// The new pipeline state is built before the program is installed, so the
    /// device rejecting it counts as a failed reload.
    pub fn reload(&mut self, ctx: &RenderCtx<'_>) -> Result<(), ShaderError> {
        self.quad.get_or_insert_with(|| FullscreenQuad::new(ctx.device));
        let sampler: &wgpu::Sampler = self
            .sampler
            .get_or_insert_with(|| textures::create_sampler(ctx.device));

        let limits = ctx.device.limits();
        let texture_paths = &self.texture_paths;
        let mut built = None;

        self.program.reload_with(|linked| {
            check_program(linked, &limits)?;
            built = Some(try_build_state(ctx, linked, sampler, texture_paths)?);
            Ok(())
        })?;

        let Some(state) = built else {
            return Err(ShaderError::NotCreated);
        };
        self.state = Some(state);

        log::info!("shaders loaded (generation {})", self.program.generation());
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// Uploads the blocks and draws the quad on top of `target`.
    pub fn draw(
        &self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view: &ViewState,
        frame: &FrameValues,
    ) {
        let (Some(state), Some(quad)) = (self.state.as_ref(), self.quad.as_ref()) else {
            return;
        };

        for block in &state.blocks {
            match block.layout().name.as_str() {
                CAMERA_BLOCK => block.upload_camera(ctx.queue, view),
                FRAME_BLOCK => block.upload_frame(ctx.queue, frame),
                _ => {}
            }
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("fieldview fullscreen pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(state.gpu.pipeline());
        for (i, group) in state.bind_groups.iter().enumerate() {
            rpass.set_bind_group(i as u32, group, &[]);
        }
        quad.bind(&mut rpass);
        rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, 0..1);
    }
}

/// The camera block must exist and hold four vec4 slots, and the whole
/// program must fit the device.
fn check_program(linked: &LinkedProgram, limits: &wgpu::Limits) -> Result<(), ShaderError> {
    BlockLayout::from_program(linked, CAMERA_BLOCK)?.require_size(CAMERA_BLOCK_MIN_SIZE)?;
    linked.check_limits(limits)
}

/// `build_state` under a validation scope. Anything the device refuses is
/// returned as a link error instead of reaching the uncaptured error handler.
fn try_build_state(
    ctx: &RenderCtx<'_>,
    linked: &LinkedProgram,
    sampler: &wgpu::Sampler,
    texture_paths: &[PathBuf],
) -> Result<PipelineState, ShaderError> {
    let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
    let state = build_state(ctx, linked, sampler, texture_paths);

    match pollster::block_on(scope.pop()) {
        None => Ok(state),
        Some(err) => Err(ShaderError::Link {
            log: format!("device rejected the pipeline: {err}"),
        }),
    }
}

fn build_state(
    ctx: &RenderCtx<'_>,
    linked: &LinkedProgram,
    sampler: &wgpu::Sampler,
    texture_paths: &[PathBuf],
) -> PipelineState {
    let gpu = GpuProgram::new(ctx.device, ctx.surface_format, linked);

    let blocks: Vec<UniformBlock> = linked
        .resources()
        .iter()
        .filter_map(BlockLayout::from_resource)
        .map(|layout| UniformBlock::setup(ctx.device, layout))
        .collect();

    let slot_textures: Vec<(String, SlotTexture)> = linked
        .resources()
        .iter()
        .filter(|r| r.kind == ResourceKind::Texture)
        .map(|r| {
            let pixels = match textures::slot_path(texture_paths, &r.name) {
                Some(path) => textures::load_or_fallback(path),
                None => Pixels::fallback(),
            };
            (r.name.clone(), SlotTexture::upload(ctx.device, ctx.queue, &pixels))
        })
        .collect();

    let bind_groups = gpu
        .bind_group_layouts()
        .iter()
        .enumerate()
        .map(|(group, bgl)| {
            let entries: Vec<wgpu::BindGroupEntry<'_>> = linked
                .resources()
                .iter()
                .filter(|r| r.group == group as u32)
                .filter_map(|r| {
                    let resource = match r.kind {
                        ResourceKind::UniformBlock { .. } => blocks
                            .iter()
                            .find(|b| b.layout().name == r.name)?
                            .binding_resource(),
                        ResourceKind::Texture => {
                            let (_, tex) = slot_textures.iter().find(|(n, _)| *n == r.name)?;
                            wgpu::BindingResource::TextureView(tex.view())
                        }
                        ResourceKind::Sampler => wgpu::BindingResource::Sampler(sampler),
                    };
                    Some(wgpu::BindGroupEntry {
                        binding: r.binding,
                        resource,
                    })
                })
                .collect();

            ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("fieldview program bind group"),
                layout: bgl,
                entries: &entries,
            })
        })
        .collect();

    PipelineState {
        bind_groups,
        blocks,
        _textures: slot_textures.into_iter().map(|(_, t)| t).collect(),
        gpu,
    }
}
