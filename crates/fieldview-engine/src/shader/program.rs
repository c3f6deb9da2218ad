use std::path::{Path, PathBuf};

use super::error::{ShaderError, StageKind};
use super::link::{link, LinkedProgram};
use super::stage::CompiledStage;

/// Source paths for a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl ShaderPaths {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

/// A vertex/fragment program with a load, create, link, destroy lifecycle.
///
/// The linked program only ever changes on a fully successful link, so a
/// failed edit leaves the last good program in place.
#[derive(Debug, Default)]
pub struct ShaderProgram {
    // Field order is drop order: the linked program goes before its stages.
    linked: Option<LinkedProgram>,
    fragment: Option<CompiledStage>,
    vertex: Option<CompiledStage>,

    paths: Option<ShaderPaths>,
    generation: u64,
}

impl ShaderProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the source paths. Nothing is read until `create`.
    pub fn load(&mut self, paths: ShaderPaths) {
        self.paths = Some(paths);
    }

    pub fn paths(&self) -> Option<&ShaderPaths> {
        self.paths.as_ref()
    }

    /// Reads and compiles both stages and attaches them.
    ///
    /// Stages are attached only if both compile. The current linked program is
    /// never touched.
    pub fn create(&mut self) -> Result<(), ShaderError> {
        let (vertex, fragment) = self.compile_stages().inspect_err(|e| log::error!("{e}"))?;

        self.vertex = Some(vertex);
        self.fragment = Some(fragment);
        Ok(())
    }

    /// Links the attached stages. On success the result replaces the current
    /// program; on failure the current program is kept.
    pub fn link(&mut self) -> Result<(), ShaderError> {
        let (Some(vertex), Some(fragment)) = (&self.vertex, &self.fragment) else {
            return Err(ShaderError::NotCreated);
        };

        let linked = link(vertex, fragment).inspect_err(|e| log::error!("{e}"))?;
        self.install(linked);
        Ok(())
    }

    /// Releases the program and both stages. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.linked.take().is_some() {
            log::debug!("shader program destroyed");
        }
        self.fragment = None;
        self.vertex = None;
    }

    /// `create` then `link`.
    pub fn build(&mut self) -> Result<(), ShaderError> {
        self.create()?;
        self.link()
    }

    /// Rebuilds from the recorded paths, all or nothing.
    ///
    /// `check` sees the candidate before it is installed; rejecting it leaves
    /// the current program and stages exactly as they were.
    pub fn reload_with(
        &mut self,
        check: impl FnOnce(&LinkedProgram) -> Result<(), ShaderError>,
    ) -> Result<(), ShaderError> {
        let result = self.compile_stages().and_then(|(vertex, fragment)| {
            let linked = link(&vertex, &fragment)?;
            check(&linked)?;
            Ok((vertex, fragment, linked))
        });

        match result {
            Ok((vertex, fragment, linked)) => {
                self.vertex = Some(vertex);
                self.fragment = Some(fragment);
                self.install(linked);
                Ok(())
            }
            Err(e) => {
                log::error!("reload failed, keeping the previous program: {e}");
                Err(e)
            }
        }
    }

    pub fn reload(&mut self) -> Result<(), ShaderError> {
        self.reload_with(|_| Ok(()))
    }

    pub fn linked(&self) -> Option<&LinkedProgram> {
        self.linked.as_ref()
    }

    pub fn is_linked(&self) -> bool {
        self.linked.is_some()
    }

    /// Bumped on every successful link.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Byte size of a uniform block in the linked program.
    pub fn uniform_block_size(&self, name: &str) -> Option<u64> {
        self.linked.as_ref()?.uniform_block_size(name)
    }

    fn compile_stages(&self) -> Result<(CompiledStage, CompiledStage), ShaderError> {
        let paths = self.paths.as_ref().ok_or(ShaderError::NoSources)?;

        let vertex = compile(StageKind::Vertex, &paths.vertex)?;
        let fragment = compile(StageKind::Fragment, &paths.fragment)?;
        Ok((vertex, fragment))
    }

    fn install(&mut self, linked: LinkedProgram) {
        self.linked = Some(linked);
        self.generation += 1;
        log::info!("shader program linked (generation {})", self.generation);
    }
}

fn compile(kind: StageKind, path: &Path) -> Result<CompiledStage, ShaderError> {
    let stage = CompiledStage::from_file(kind, path)?;
    log::debug!("compiled {kind} shader {}", path.display());
    Ok(stage)
}
