use crate::input::InputEvent;

/// Window creation parameters.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    pub title: String,
    /// Initial drawable width in logical pixels.
    pub width: u32,
    /// Initial drawable height in logical pixels.
    pub height: u32,
    /// Borderless fullscreen on the current monitor.
    pub fullscreen: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            title: "fieldview".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
        }
    }
}

/// Drawable surface and platform event source consumed by the frame loop.
///
/// The runtime depends only on this trait; `WinitSurface` is the desktop
/// implementation and tests use a scripted one.
pub trait Surface {
    /// Drawable size in physical pixels. Implementations clamp each side to at least 1.
    fn size(&self) -> (u32, u32);

    fn set_title(&mut self, title: &str);

    /// Wall-clock seconds since the surface was created.
    fn time(&self) -> f32;

    /// Pumps pending platform events and hands every translated event to `sink`
    /// in arrival order. Must not block past the current frame.
    fn poll_events(&mut self, sink: &mut dyn FnMut(InputEvent));

    /// Presents the frame rendered during this iteration, if any.
    fn present(&mut self);

    fn should_close(&self) -> bool;

    /// Sets the close flag. The loop exits after the current iteration.
    fn request_close(&mut self);

    /// Minimized (iconified) surfaces skip the update listener.
    fn is_minimized(&self) -> bool;
}
