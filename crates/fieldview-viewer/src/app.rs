use std::path::PathBuf;

use anyhow::Context;

use fieldview_engine::camera::{CameraController, CameraSettings, FrameStates};
use fieldview_engine::core::{App, AppControl, FrameCtx};
use fieldview_engine::render::{FrameValues, FullscreenRenderer};
use fieldview_engine::shader::ShaderPaths;
use fieldview_engine::window::WinitSurface;

/// Wires the listener slots to the camera controller and the renderer.
pub struct ViewerApp {
    shaders: ShaderPaths,
    renderer: FullscreenRenderer,
    frames: FrameStates,
    controller: CameraController,
}

impl ViewerApp {
    pub fn new(shaders: ShaderPaths, textures: Vec<PathBuf>) -> Self {
        Self {
            shaders,
            renderer: FullscreenRenderer::new(textures),
            frames: FrameStates::new(),
            controller: CameraController::new(CameraSettings::default()),
        }
    }
}

impl App<WinitSurface> for ViewerApp {
    fn on_init(&mut self, surface: &mut WinitSurface) -> anyhow::Result<()> {
        let renderer = &mut self.renderer;
        let paths = self.shaders.clone();

        let loaded = surface
            .with_gpu(|gpu| renderer.load(&gpu.render_ctx(), paths))
            .context("surface has no GPU context")?;

        // A broken shader at startup is not fatal: F1 retries after an edit.
        if loaded.is_err() {
            log::warn!("starting without a shader program; fix the sources and press F1");
        }
        Ok(())
    }

    fn on_time(&mut self, time: f32) {
        self.frames.current.time = time;
    }

    fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.frames.current.mouse.x = x;
        self.frames.current.mouse.y = y;
    }

    fn on_mouse_scroll(&mut self, total: f32) {
        self.frames.current.mouse.scroll_y = total;
    }

    fn on_update(&mut self, ctx: &mut FrameCtx<'_, WinitSurface>) -> AppControl {
        let size = ctx.size();
        let actions = self
            .controller
            .update(&mut self.frames, ctx.input, ctx.input_frame, size);

        let view = self.frames.current.view;
        let time = self.frames.current.time;
        let renderer = &mut self.renderer;

        let rendered = ctx.surface.with_gpu(|gpu| {
            if actions.reload_shaders {
                // Failures are logged; the previous program keeps drawing.
                let _ = renderer.reload(&gpu.render_ctx());
            }

            gpu.render(wgpu::Color::BLACK, |rctx, target| {
                let frame = FrameValues {
                    resolution: rctx.resolution(),
                    time,
                    debug: i32::from(actions.debug_mode),
                };
                renderer.draw(rctx, target, &view, &frame);
            })
        });

        match rendered {
            Some(Ok(())) => AppControl::Continue,
            Some(Err(e)) => {
                log::error!("{e:#}");
                AppControl::Exit
            }
            None => AppControl::Exit,
        }
    }
}
