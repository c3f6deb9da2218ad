//! WGSL shader programs.
//!
//! Sources are compiled and validated with naga on the CPU, then linked:
//! the vertex outputs must feed the fragment inputs, and the resources of both
//! stages are merged into one reflected set. Only a linked program is turned
//! into a wgpu pipeline.

mod error;
mod gpu;
mod link;
mod program;
mod stage;

pub use error::{ShaderError, StageKind};
pub use gpu::GpuProgram;
pub use link::{
    link, BlockMember, IoType, LinkedProgram, LinkedStage, Resource, ResourceKind,
    MAX_BIND_GROUPS, QUAD_LOCATION,
};
pub use program::{ShaderPaths, ShaderProgram};
pub use stage::{read_source, CompiledStage};
