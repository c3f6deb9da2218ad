use std::fmt;
use std::path::PathBuf;

/// Pipeline stage a source file is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub fn naga_stage(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }

    pub fn wgpu_stage(self) -> wgpu::ShaderStages {
        match self {
            StageKind::Vertex => wgpu::ShaderStages::VERTEX,
            StageKind::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader program failures. All of them are recoverable at runtime.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("no shader sources loaded")]
    NoSources,

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader {} failed to compile:\n{log}", .path.display())]
    Compile {
        stage: StageKind,
        path: PathBuf,
        log: String,
    },

    #[error("program failed to link:\n{log}")]
    Link { log: String },

    #[error("uniform block `{0}` not found in the linked program")]
    MissingBlock(String),

    #[error("uniform block `{name}` is {size} bytes, at least {required} required")]
    BlockTooSmall {
        name: String,
        size: u64,
        required: u64,
    },

    #[error("program has not been created")]
    NotCreated,
}
