use bytemuck::{Pod, Zeroable};
use wgpu::{VertexAttribute, VertexBufferLayout, VertexStepMode, vertex_attr_array};

/// Corner of a textured quad, already in normalized device coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub(crate) position: [f32; 2],
    /// Multiplied with the sampled texel; white leaves the texture unchanged
    pub(crate) tint: [f32; 4],
    pub(crate) uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [VertexAttribute; 3] =
        vertex_attr_array![0 => Float32x2, 1 => Float32x4, 2 => Float32x2];

    pub fn new(position: [f32; 2], tint: [f32; 4], uv: [f32; 2]) -> Self {
        Self { position, tint, uv }
    }

    /// Layout of `VertexInput` in `shader.wgsl`
    pub fn layout() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: size_of::<Self>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
