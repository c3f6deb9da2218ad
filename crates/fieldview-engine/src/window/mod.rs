//! Surface contract + frame loop.
//!
//! `Runtime` drives any [`Surface`]. `WinitSurface` owns the winit event loop
//! and window and wires them to the GPU layer.

mod runtime;
mod surface;
mod winit_surface;

pub use runtime::{Runtime, RuntimeError};
pub use surface::{Surface, SurfaceConfig};
pub use winit_surface::WinitSurface;
