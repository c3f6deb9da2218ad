use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};

use crate::device::{Gpu, GpuInit};
use crate::input::platform::{InputTranslator, Translated};
use crate::input::InputEvent;

use super::surface::{Surface, SurfaceConfig};

/// Pumps allowed for the platform to deliver `resumed` during creation.
const CREATE_PUMPS: usize = 16;

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Receives winit callbacks while the loop is being pumped.
struct SurfaceHandler {
    config: SurfaceConfig,
    gpu_init: GpuInit,

    entry: Option<WindowEntry>,
    create_error: Option<anyhow::Error>,

    translator: InputTranslator,
    pending: Vec<InputEvent>,
    close_requested: bool,
}

impl SurfaceHandler {
    fn new(config: SurfaceConfig, gpu_init: GpuInit) -> Self {
        Self {
            config,
            gpu_init,
            entry: None,
            create_error: None,
            translator: InputTranslator::new(),
            pending: Vec::new(),
            close_requested: false,
        }
    }

    fn create_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let fullscreen = self
            .config
            .fullscreen
            .then(|| Fullscreen::Borderless(None));

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(self.config.width),
                f64::from(self.config.height),
            ))
            .with_fullscreen(fullscreen);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        // On failure the window is dropped here, before the error reaches the caller.
        WindowEntry::try_new(window, |w| pollster::block_on(Gpu::new(w, gpu_init)))
            .context("GPU initialization failed")
    }
}

impl ApplicationHandler for SurfaceHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.create_error.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);

        match self.create_entry(event_loop) {
            Ok(entry) => self.entry = Some(entry),
            Err(e) => {
                log::error!("failed to create surface: {e:#}");
                self.create_error = Some(e);
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        match &event {
            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                self.pending.push(InputEvent::Resized {
                    width: new_size.width,
                    height: new_size.height,
                });
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            _ => {}
        }

        let translator = &mut self.translator;
        let translated = entry.with_window(|w| translator.translate(w, &event));

        match translated {
            Translated::Input(ev) => self.pending.push(ev),
            Translated::Close => self.close_requested = true,
            Translated::Ignored => {}
        }
    }
}

/// Desktop surface: a winit window plus its wgpu context, driven by pumping.
///
/// The event loop is pumped once per `poll_events`, never run to completion,
/// so the frame loop stays in control.
pub struct WinitSurface {
    // Dropped before the event loop that created the window.
    handler: SurfaceHandler,
    event_loop: EventLoop<()>,
    started: Instant,
}

impl WinitSurface {
    /// Creates the window and GPU context.
    ///
    /// Fails when the event loop or window cannot be created, when no adapter
    /// meets `gpu_init.minimum_shader_model`, or when the device cannot be created.
    /// Nothing stays open on failure.
    pub fn create(config: SurfaceConfig, gpu_init: GpuInit) -> Result<Self> {
        let mut event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut handler = SurfaceHandler::new(config, gpu_init);

        for _ in 0..CREATE_PUMPS {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut handler);

            if let Some(err) = handler.create_error.take() {
                return Err(err);
            }
            if handler.entry.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited with code {code} before the window was created");
            }
        }

        anyhow::ensure!(handler.entry.is_some(), "platform never resumed; no window was created");

        Ok(Self {
            handler,
            event_loop,
            started: Instant::now(),
        })
    }

    /// Runs `f` with the GPU context. Returns `None` only if the window is gone.
    pub fn with_gpu<R>(&mut self, f: impl FnOnce(&mut Gpu<'_>) -> R) -> Option<R> {
        let entry = self.handler.entry.as_mut()?;
        Some(entry.with_gpu_mut(|gpu| f(gpu)))
    }
}

impl Surface for WinitSurface {
    fn size(&self) -> (u32, u32) {
        match self.handler.entry.as_ref() {
            Some(entry) => {
                let size = entry.with_gpu(|gpu| gpu.size());
                (size.width.max(1), size.height.max(1))
            }
            None => (self.handler.config.width.max(1), self.handler.config.height.max(1)),
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(entry) = self.handler.entry.as_ref() {
            entry.with_window(|w| w.set_title(title));
        }
    }

    fn time(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    fn poll_events(&mut self, sink: &mut dyn FnMut(InputEvent)) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);

        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.handler.close_requested = true;
        }

        for ev in self.handler.pending.drain(..) {
            sink(ev);
        }
    }

    fn present(&mut self) {
        if let Some(entry) = self.handler.entry.as_mut() {
            entry.with_mut(|fields| {
                fields.window.pre_present_notify();
                fields.gpu.present();
            });
        }
    }

    fn should_close(&self) -> bool {
        self.handler.close_requested
    }

    fn request_close(&mut self) {
        self.handler.close_requested = true;
    }

    fn is_minimized(&self) -> bool {
        let Some(entry) = self.handler.entry.as_ref() else {
            return true;
        };

        let iconified = entry.with_window(|w| w.is_minimized().unwrap_or(false));
        let size = entry.with_gpu(|gpu| gpu.size());
        iconified || size.width == 0 || size.height == 0
    }
}
