use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Corner of the fullscreen quad, already in clip space.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 4],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, -1.0, 0.0, 1.0] },
    QuadVertex { pos: [1.0, -1.0, 0.0, 1.0] },
    QuadVertex { pos: [-1.0, 1.0, 0.0, 1.0] },
    QuadVertex { pos: [1.0, 1.0, 0.0, 1.0] },
];

/// Two counter-clockwise triangles.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 1, 3, 2];

pub const QUAD_INDEX_COUNT: u32 = QUAD_INDICES.len() as u32;

/// Vertex and index buffers for the quad. Created once per device.
pub struct FullscreenQuad {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
}

impl FullscreenQuad {
    pub fn new(device: &wgpu::Device) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fieldview quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fieldview quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self { vertices, indices }
    }

    pub fn bind<'p>(&self, rpass: &mut wgpu::RenderPass<'p>) {
        rpass.set_vertex_buffer(0, self.vertices.slice(..));
        rpass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(i: u32) -> [f32; 2] {
        let p = QUAD_VERTICES[i as usize].pos;
        [p[0], p[1]]
    }

    fn signed_area(tri: &[u32]) -> f32 {
        let [a, b, c] = [corner(tri[0]), corner(tri[1]), corner(tri[2])];
        (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
    }

    #[test]
    fn quad_covers_clip_space() {
        for v in QUAD_VERTICES {
            assert_eq!(v.pos[0].abs(), 1.0);
            assert_eq!(v.pos[1].abs(), 1.0);
            assert_eq!(v.pos[2], 0.0);
            assert_eq!(v.pos[3], 1.0);
        }
        assert_eq!(std::mem::size_of::<QuadVertex>(), 16);
    }

    #[test]
    fn triangles_share_winding_and_fill_the_square() {
        let areas: Vec<f32> = QUAD_INDICES.chunks(3).map(signed_area).collect();
        assert!(areas.iter().all(|a| *a > 0.0));
        // Full square in [-1, 1]^2 has area 4; each signed area is twice a triangle.
        assert_eq!(areas.iter().sum::<f32>(), 8.0);
    }
}
