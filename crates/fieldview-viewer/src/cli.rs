use std::path::PathBuf;

use clap::Parser;

use fieldview_engine::logging::LoggingConfig;
use fieldview_engine::render::textures::TEXTURE_SLOTS;
use fieldview_engine::shader::ShaderPaths;
use fieldview_engine::window::SurfaceConfig;

const DEFAULT_VERTEX: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/vert.wgsl");
const DEFAULT_FRAGMENT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/frag.wgsl");

#[derive(Debug, Parser)]
#[command(name = "fieldview", about = "Fullscreen shader viewer with hot reload")]
pub struct Cli {
    /// Vertex shader (WGSL)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_VERTEX)]
    pub vertex: PathBuf,

    /// Fragment shader (WGSL)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_FRAGMENT)]
    pub fragment: PathBuf,

    /// Image bound to tex1, tex2, tex3 in order. Repeat up to three times.
    #[arg(long = "texture", value_name = "PATH")]
    pub textures: Vec<PathBuf>,

    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Borderless fullscreen on the current monitor
    #[arg(long)]
    pub fullscreen: bool,

    #[arg(long, default_value = "fieldview")]
    pub title: String,

    /// Log filter in env_logger syntax; overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

impl Cli {
    /// Checks constraints clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.textures.len() > TEXTURE_SLOTS.len() {
            return Err(format!(
                "at most {} textures are supported, got {}",
                TEXTURE_SLOTS.len(),
                self.textures.len()
            ));
        }
        Ok(())
    }

    pub fn surface_config(&self) -> SurfaceConfig {
        SurfaceConfig {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            fullscreen: self.fullscreen,
        }
    }

    pub fn shader_paths(&self) -> ShaderPaths {
        ShaderPaths::new(self.vertex.clone(), self.fragment.clone())
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..LoggingConfig::default()
        }
    }
}
