use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};

use super::error::{ShaderError, StageKind};

/// One validated WGSL stage.
#[derive(Debug)]
pub struct CompiledStage {
    kind: StageKind,
    path: PathBuf,
    source: String,
    module: naga::Module,
    info: ModuleInfo,
    entry_index: usize,
}

impl CompiledStage {
    /// Reads and compiles `path` as a `kind` stage.
    pub fn from_file(kind: StageKind, path: &Path) -> Result<Self, ShaderError> {
        let source = read_source(path)?;
        Self::compile(kind, path, source)
    }

    /// Parses and validates `source`. `path` is only used in diagnostics.
    ///
    /// The module must declare exactly one entry point for `kind`; any other
    /// entry points are ignored.
    pub fn compile(kind: StageKind, path: &Path, source: String) -> Result<Self, ShaderError> {
        let compile_error = |log: String| ShaderError::Compile {
            stage: kind,
            path: path.to_path_buf(),
            log,
        };

        let module = naga::front::wgsl::parse_str(&source)
            .map_err(|e| compile_error(e.emit_to_string(&source)))?;

        let info = Validator::new(ValidationFlags::all(), Capabilities::empty())
            .validate(&module)
            .map_err(|e| compile_error(e.emit_to_string(&source)))?;

        let stage = kind.naga_stage();
        let mut candidates = module
            .entry_points
            .iter()
            .enumerate()
            .filter(|(_, ep)| ep.stage == stage);

        let Some((entry_index, _)) = candidates.next() else {
            return Err(compile_error(format!("no @{kind} entry point")));
        };

        if candidates.next().is_some() {
            return Err(compile_error(format!("more than one @{kind} entry point")));
        }

        Ok(Self {
            kind,
            path: path.to_path_buf(),
            source,
            module,
            info,
            entry_index,
        })
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    pub fn entry_point(&self) -> &naga::EntryPoint {
        &self.module.entry_points[self.entry_index]
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_point().name
    }
}

/// Reads a whole source file. A missing file is also reported as a warning.
pub fn read_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            log::warn!("file \"{}\" not found", path.display());
        }
        ShaderError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
