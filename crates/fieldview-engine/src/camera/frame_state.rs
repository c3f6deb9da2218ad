use super::view::ViewState;

/// Pointer readings as delivered by the mouse listeners.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    /// Running wheel total, not a per-event delta.
    pub scroll_y: f32,
}

/// Everything the camera reads or writes in one frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameState {
    pub view: ViewState,
    pub mouse: MouseState,
    pub time: f32,
    pub width: u32,
    pub height: u32,
}

/// Per-frame differences between `current` and `previous`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameDeltas {
    pub dt: f32,
    pub wheel: f32,
    pub dx: f32,
    pub dy: f32,
}

/// Two-deep frame ring.
///
/// Listeners write into `current` as events arrive. `snapshot` copies the whole
/// of `current` into `previous`, so deltas always span exactly one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameStates {
    pub current: FrameState,
    pub previous: FrameState,
}

impl FrameStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deltas(&self) -> FrameDeltas {
        let (cur, prev) = (&self.current, &self.previous);

        FrameDeltas {
            dt: cur.time - prev.time,
            wheel: cur.mouse.scroll_y - prev.mouse.scroll_y,
            dx: cur.mouse.x - prev.mouse.x,
            dy: cur.mouse.y - prev.mouse.y,
        }
    }

    /// Must run after every read of `previous` in the frame.
    pub fn snapshot(&mut self) {
        self.previous = self.current;
    }
}
