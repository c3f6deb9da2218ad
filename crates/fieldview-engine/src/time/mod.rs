//! Time subsystem.
//!
//! Provides deterministic frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` and one `FpsCounter` per surface
//! - call `tick(now)` once per loop iteration with the surface's wall-clock sample

mod fps;
mod frame_clock;

pub use fps::FpsCounter;
pub use frame_clock::{FrameClock, FrameTime};
