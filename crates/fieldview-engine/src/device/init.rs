/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Ask for an sRGB surface. Off by default: the shaders write gamma-encoded color.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// FIFO is broadly supported and paces the loop to the display.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Lowest adapter shader model accepted. Anything below is a fatal startup error.
    pub minimum_shader_model: wgpu::ShaderModel,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            minimum_shader_model: wgpu::ShaderModel::Sm5,
        }
    }
}

/// Returns `true` when `actual` is at least `required`.
pub fn meets_shader_model(actual: wgpu::ShaderModel, required: wgpu::ShaderModel) -> bool {
    shader_model_rank(actual) >= shader_model_rank(required)
}

fn shader_model_rank(model: wgpu::ShaderModel) -> u8 {
    match model {
        wgpu::ShaderModel::Sm2 => 2,
        wgpu::ShaderModel::Sm4 => 4,
        wgpu::ShaderModel::Sm5 => 5,
    }
}
