use super::{Vertex, VERTEX_STRIDE_FLOATS};

/// Geometry ready for upload: interleaved vertices plus an optional index list.
///
/// `indices == None` means the vertices form an un-indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Option<Vec<u16>>,
}

impl MeshData {
    #[inline]
    pub fn new(vertices: Vec<Vertex>, indices: Option<Vec<u16>>) -> Self {
        Self { vertices, indices }
    }

    /// Flat view of the interleaved vertex stream.
    #[inline]
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Vertex count, derived from the float stream as `floats / 8`.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.as_floats().len() / VERTEX_STRIDE_FLOATS
    }

    #[inline]
    pub fn index_count(&self) -> Option<usize> {
        self.indices.as_ref().map(Vec::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
