//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - rejecting adapters below the minimum shader model
//! - creating & configuring the Surface (swapchain)
//! - acquiring, submitting and presenting frames

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::{meets_shader_model, GpuInit};
pub use surface::SurfaceErrorAction;
