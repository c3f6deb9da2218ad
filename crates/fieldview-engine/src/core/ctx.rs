use crate::input::{InputFrame, InputState};
use crate::time::FrameTime;
use crate::window::Surface;

/// Per-frame context passed to `core::App::on_update`.
///
/// `'a` is the duration of the callback invocation.
pub struct FrameCtx<'a, S: Surface> {
    pub surface: &'a mut S,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl<'a, S: Surface> FrameCtx<'a, S> {
    /// Drawable size in physical pixels, never zero.
    pub fn size(&self) -> (u32, u32) {
        self.surface.size()
    }
}
