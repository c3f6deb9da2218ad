//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (frame loop)
//! and higher layers (the viewer). Listeners are either a type implementing
//! [`App`] or a [`Callbacks`] registry of closures.

mod app;
mod callbacks;
mod ctx;

pub use app::{App, AppControl};
pub use callbacks::Callbacks;
pub use ctx::FrameCtx;
