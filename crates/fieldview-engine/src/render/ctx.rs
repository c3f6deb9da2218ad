/// What a renderer may touch during one frame.
///
/// Borrowed from `Gpu` for the duration of a draw or a reload; renderers never
/// hold on to it.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Physical pixels, never zero.
    pub size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            size,
        }
    }

    /// Drawable size as the `vec3` resolution shaders expect, with z = 1.
    pub fn resolution(&self) -> [f32; 3] {
        [self.size.0 as f32, self.size.1 as f32, 1.0]
    }
}

/// Where one frame is recorded: the frame encoder and the acquired surface view.
///
/// Passes opened on it must load, not clear; the clear pass already ran.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
