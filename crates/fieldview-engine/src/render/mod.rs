//! GPU rendering subsystem.
//!
//! One renderer draws one shader program over a fullscreen quad. It owns its
//! own GPU resources (pipeline, bind groups, uniform buffers, textures) and
//! rebuilds them whenever the program relinks.
//!
//! Convention:
//! - The quad is already in clip space; vertex shaders pass it through.
//! - Uniform layouts come from shader reflection, not from Rust structs.

mod ctx;
pub mod quad;
mod renderer;
pub mod textures;
pub mod uniforms;

pub use ctx::{RenderCtx, RenderTarget};
pub use renderer::FullscreenRenderer;
pub use uniforms::{BlockLayout, FrameValues, UniformBlock};
