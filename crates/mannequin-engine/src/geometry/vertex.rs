use bytemuck::{Pod, Zeroable};

/// Number of `f32` values per interleaved vertex.
pub const VERTEX_STRIDE_FLOATS: usize = 8;

/// Interleaved vertex: position, normal, texture coordinate.
///
/// `#[repr(C)]` keeps the 8-float stride, so a `&[Vertex]` can be viewed as a
/// flat `&[f32]` (and uploaded as raw bytes) without copying.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    #[inline]
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }
}

const _: () = assert!(std::mem::size_of::<Vertex>() == VERTEX_STRIDE_FLOATS * 4);
