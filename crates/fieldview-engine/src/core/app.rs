use crate::input::KeyEvent;
use crate::window::Surface;

use super::ctx::FrameCtx;

/// Control directive returned by the update listener.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Listener contract implemented by higher layers.
///
/// Every method has a no-op default, so an application only overrides the
/// slots it cares about. The runtime calls them at fixed points of the frame loop:
///
/// 1. `on_init` once, before the first frame
/// 2. per frame: `on_time`, then `on_update` unless the surface is minimized
/// 3. while polling: `on_key`, `on_mouse_move`, `on_mouse_scroll`, `on_resize`
/// 4. `on_finish` once, after the close flag is observed
pub trait App<S: Surface> {
    /// Called once before the loop starts. An error aborts `run`.
    fn on_init(&mut self, surface: &mut S) -> anyhow::Result<()> {
        let _ = surface;
        Ok(())
    }

    /// Called every frame with the wall-clock time in seconds.
    fn on_time(&mut self, time: f32) {
        let _ = time;
    }

    /// Called once per frame unless the surface is minimized.
    fn on_update(&mut self, ctx: &mut FrameCtx<'_, S>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Called for every dispatched key or mouse-button event.
    fn on_key(&mut self, event: &KeyEvent) {
        let _ = event;
    }

    /// Called with the cursor position in logical pixels.
    fn on_mouse_move(&mut self, x: f32, y: f32) {
        let _ = (x, y);
    }

    /// Called with the running wheel total, not the per-event delta.
    fn on_mouse_scroll(&mut self, total: f32) {
        let _ = total;
    }

    /// Called when the drawable size changes, in physical pixels.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called once after the loop exits, before the surface is released.
    fn on_finish(&mut self, surface: &mut S) {
        let _ = surface;
    }
}
