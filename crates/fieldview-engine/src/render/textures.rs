use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

/// Texture slot names, in the order texture paths are assigned to them.
pub const TEXTURE_SLOTS: [&str; 3] = ["tex1", "tex2", "tex3"];

/// Name of the sampler shared by every slot.
pub const SAMPLER_NAME: &str = "samp";

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Pixels {
    /// Stand-in for a slot with no image.
    pub fn fallback() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        }
    }
}

/// Decodes an image file into RGBA8.
pub fn load_pixels(path: &Path) -> Result<Pixels, image::ImageError> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();

    Ok(Pixels {
        width,
        height,
        rgba: img.into_raw(),
    })
}

/// Decodes `path`, or logs a warning and returns the fallback.
pub fn load_or_fallback(path: &Path) -> Pixels {
    match load_pixels(path) {
        Ok(px) => {
            log::debug!("loaded texture {} ({}x{})", path.display(), px.width, px.height);
            px
        }
        Err(e) => {
            log::warn!("texture \"{}\" not loaded: {e}", path.display());
            Pixels::fallback()
        }
    }
}

/// Path assigned to slot `name`, if any.
pub fn slot_path<'a>(paths: &'a [PathBuf], name: &str) -> Option<&'a Path> {
    let index = TEXTURE_SLOTS.iter().position(|s| *s == name)?;
    paths.get(index).map(PathBuf::as_path)
}

/// One uploaded 2D texture.
pub struct SlotTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl SlotTexture {
    pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, pixels: &Pixels) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("fieldview slot texture"),
                size: wgpu::Extent3d {
                    width: pixels.width,
                    height: pixels.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &pixels.rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

/// Linear filtering, repeat addressing.
pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("fieldview sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}
