/// Frames-per-second counter over a fixed accumulation window.
///
/// Each tick counts one frame. Once more than `window` seconds of `dt` have
/// accumulated, `tick` yields the frame count and the accumulator restarts.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: f32,
    elapsed: f32,
    frames: u32,
}

impl FpsCounter {
    /// One-second window.
    pub fn new() -> Self {
        Self::with_window(1.0)
    }

    pub fn with_window(window: f32) -> Self {
        debug_assert!(window > 0.0);
        Self {
            window,
            elapsed: 0.0,
            frames: 0,
        }
    }

    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        self.elapsed += dt;
        self.frames += 1;

        if self.elapsed > self.window {
            let fps = self.frames;
            self.elapsed = 0.0;
            self.frames = 0;
            return Some(fps);
        }

        None
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
