//! Per-frame uniform blocks.
//!
//! Block layout comes from the linked program's reflection, never from a Rust
//! struct, so a shader edit that reorders or resizes a block is picked up on
//! the next reload.

use crate::camera::ViewState;
use crate::shader::{BlockMember, LinkedProgram, Resource, ShaderError};

/// Block holding the camera basis.
pub const CAMERA_BLOCK: &str = "camera";

/// Optional block holding resolution, time and debug mode.
pub const FRAME_BLOCK: &str = "frame";

/// Position, direction, right and up, one `vec4<f32>` each.
pub const CAMERA_BLOCK_MIN_SIZE: u64 = 64;

/// Reflected layout of one uniform block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    pub size: u64,
    pub members: Vec<BlockMember>,
}

impl BlockLayout {
    pub fn from_program(program: &LinkedProgram, name: &str) -> Result<Self, ShaderError> {
        program
            .resource(name)
            .and_then(Self::from_resource)
            .ok_or_else(|| ShaderError::MissingBlock(name.to_string()))
    }

    /// `None` unless `resource` is a uniform block.
    pub fn from_resource(resource: &Resource) -> Option<Self> {
        Some(Self {
            name: resource.name.clone(),
            group: resource.group,
            binding: resource.binding,
            size: resource.block_size()?,
            members: resource.members().to_vec(),
        })
    }

    /// Fails with `BlockTooSmall` when the block is under `required` bytes.
    pub fn require_size(self, required: u64) -> Result<Self, ShaderError> {
        if self.size < required {
            return Err(ShaderError::BlockTooSmall {
                name: self.name,
                size: self.size,
                required,
            });
        }
        Ok(self)
    }

    pub fn member(&self, name: &str) -> Option<&BlockMember> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Values for the `frame` block.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameValues {
    pub resolution: [f32; 3],
    pub time: f32,
    pub debug: i32,
}

/// Camera block contents: four vec4 slots, the rest of the block zeroed.
pub fn encode_camera(layout: &BlockLayout, view: &ViewState) -> Vec<u8> {
    let slots: [[f32; 4]; 4] = [
        view.position.extend(1.0).to_array(),
        view.direction.extend(0.0).to_array(),
        view.right.extend(0.0).to_array(),
        view.up.extend(0.0).to_array(),
    ];

    let mut bytes = vec![0u8; layout.size as usize];
    put(&mut bytes, 0, bytemuck::cast_slice(&slots));
    bytes
}

/// Frame block contents, written by member offset.
///
/// Members the shader does not declare are skipped; `resolution` is truncated
/// to the declared width.
pub fn encode_frame(layout: &BlockLayout, values: &FrameValues) -> Vec<u8> {
    let mut bytes = vec![0u8; layout.size as usize];

    if let Some(m) = layout.member("resolution") {
        let n = (m.size as usize / 4).min(values.resolution.len());
        put(&mut bytes, m.offset, bytemuck::cast_slice(&values.resolution[..n]));
    }
    if let Some(m) = layout.member("time") {
        put(&mut bytes, m.offset, bytemuck::bytes_of(&values.time));
    }
    if let Some(m) = layout.member("debug") {
        put(&mut bytes, m.offset, bytemuck::bytes_of(&values.debug));
    }

    bytes
}

fn put(bytes: &mut [u8], offset: u32, src: &[u8]) {
    let start = offset as usize;
    let end = (start + src.len()).min(bytes.len());
    if start < end {
        bytes[start..end].copy_from_slice(&src[..end - start]);
    }
}

/// Device buffer sized to one reflected block.
pub struct UniformBlock {
    layout: BlockLayout,
    buffer: wgpu::Buffer,
}

impl UniformBlock {
    /// Allocates exactly `layout.size` bytes. Must be redone after every reload.
    pub fn setup(device: &wgpu::Device, layout: BlockLayout) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fieldview uniform block"),
            size: layout.size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!(
            "uniform block `{}` at @group({}) @binding({}): {} bytes",
            layout.name,
            layout.group,
            layout.binding,
            layout.size
        );

        Self { layout, buffer }
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    /// Replaces the whole block with `bytes`, which must be exactly the block size.
    pub fn upload(&self, queue: &wgpu::Queue, bytes: &[u8]) {
        debug_assert_eq!(bytes.len() as u64, self.layout.size);
        queue.write_buffer(&self.buffer, 0, bytes);
    }

    pub fn upload_camera(&self, queue: &wgpu::Queue, view: &ViewState) {
        self.upload(queue, &encode_camera(&self.layout, view));
    }

    pub fn upload_frame(&self, queue: &wgpu::Queue, values: &FrameValues) {
        self.upload(queue, &encode_frame(&self.layout, values));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn layout(size: u64, members: &[(&str, u32, u32)]) -> BlockLayout {
        BlockLayout {
            name: "test".to_string(),
            group: 0,
            binding: 0,
            size,
            members: members
                .iter()
                .map(|&(name, offset, size)| BlockMember {
                    name: name.to_string(),
                    offset,
                    size,
                })
                .collect(),
        }
    }

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    // ── camera ───────────────────────────────────────────────────────────

    #[test]
    fn camera_slots_are_position_direction_right_up() {
        let view = ViewState {
            position: Vec3::new(1.0, 2.0, 3.0),
            direction: Vec3::new(0.0, 0.0, 1.0),
            right: Vec3::new(-1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            ..ViewState::default()
        };

        let bytes = encode_camera(&layout(64, &[]), &view);
        assert_eq!(
            floats(&bytes),
            [
                1.0, 2.0, 3.0, 1.0, //
                0.0, 0.0, 1.0, 0.0, //
                -1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0,
            ]
        );
    }

    #[test]
    fn larger_camera_block_is_zero_filled() {
        let bytes = encode_camera(&layout(96, &[]), &ViewState::default());
        assert_eq!(bytes.len(), 96);
        assert!(bytes[64..].iter().all(|b| *b == 0));
    }

    #[test]
    fn small_block_is_rejected() {
        let err = layout(48, &[]).require_size(CAMERA_BLOCK_MIN_SIZE).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::BlockTooSmall {
                size: 48,
                required: 64,
                ..
            }
        ));
        assert!(layout(64, &[]).require_size(CAMERA_BLOCK_MIN_SIZE).is_ok());
    }

    // ── frame ────────────────────────────────────────────────────────────

    #[test]
    fn frame_members_land_at_reflected_offsets() {
        let l = layout(32, &[("resolution", 0, 12), ("time", 12, 4), ("debug", 16, 4)]);
        let values = FrameValues {
            resolution: [800.0, 600.0, 0.0],
            time: 2.5,
            debug: 3,
        };

        let bytes = encode_frame(&l, &values);

        assert_eq!(floats(&bytes[0..16]), [800.0, 600.0, 0.0, 2.5]);
        assert_eq!(i32::from_ne_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]), 3);
        assert!(bytes[20..].iter().all(|b| *b == 0));
    }

    #[test]
    fn undeclared_frame_members_are_skipped() {
        let l = layout(16, &[("time", 4, 4)]);
        let values = FrameValues {
            resolution: [1.0, 1.0, 1.0],
            time: 7.0,
            debug: 1,
        };

        assert_eq!(floats(&encode_frame(&l, &values)), [0.0, 7.0, 0.0, 0.0]);
    }

    #[test]
    fn narrow_resolution_is_truncated() {
        let l = layout(16, &[("resolution", 0, 8)]);
        let values = FrameValues {
            resolution: [640.0, 480.0, 9.0],
            ..FrameValues::default()
        };

        assert_eq!(floats(&encode_frame(&l, &values)), [640.0, 480.0, 0.0, 0.0]);
    }
}
