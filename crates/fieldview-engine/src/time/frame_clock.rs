/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Wall-clock seconds since the surface was created.
    pub time: f32,

    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,
}

/// Frame clock producing `FrameTime` snapshots from wall-clock samples.
///
/// The clock does not read the system time itself; the runtime feeds it
/// `Surface::time()` once per loop iteration. This keeps it deterministic under test.
///
/// The first tick measures from `0.0`, the moment the surface was created.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    previous: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock to `now` and returns a new `FrameTime`.
    ///
    /// Wall-clock samples are monotonic, but a backwards sample still yields `dt = 0`.
    pub fn tick(&mut self, now: f32) -> FrameTime {
        let dt = (now - self.previous).max(0.0);
        self.previous = now;

        FrameTime { time: now, dt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_measures_from_creation() {
        let mut clock = FrameClock::new();
        let ft = clock.tick(0.25);
        assert_eq!(ft.time, 0.25);
        assert_eq!(ft.dt, 0.25);
    }

    #[test]
    fn dt_is_difference_of_consecutive_samples() {
        let mut clock = FrameClock::new();
        clock.tick(1.0);
        let ft = clock.tick(1.5);
        assert_eq!(ft.dt, 0.5);
    }

    #[test]
    fn backwards_sample_clamps_to_zero() {
        let mut clock = FrameClock::new();
        clock.tick(2.0);
        assert_eq!(clock.tick(1.0).dt, 0.0);
    }
}
