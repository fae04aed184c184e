use slotmap::new_key_type;

use crate::geometry::MeshData;

new_key_type! {
    /// Backend-resident vertex (and optional index) buffer.
    pub struct MeshHandle;

    /// Backend-resident decal texture.
    pub struct TextureHandle;
}

/// An uploaded mesh: handle plus the counts needed to draw it.
///
/// Only constructed by backends from non-empty geometry, so a `Mesh` always
/// has a positive vertex count. Once released, its handle no longer resolves,
/// even after the backend reuses the slot. "No mesh" is `Option::None`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Mesh {
    handle: MeshHandle,
    vertex_count: u32,
    index_count: Option<u32>,
}

impl Mesh {
    pub(crate) fn new(handle: MeshHandle, data: &MeshData) -> Self {
        Self {
            handle,
            vertex_count: data.vertex_count() as u32,
            index_count: data.index_count().map(|n| n as u32),
        }
    }

    #[inline]
    pub fn handle(&self) -> MeshHandle {
        self.handle
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn index_count(&self) -> Option<u32> {
        self.index_count
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.index_count.is_some()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn released_handle_does_not_alias_reused_slot() {
        let mut table: SlotMap<MeshHandle, &str> = SlotMap::with_key();
        let a = table.insert("cube");
        assert_eq!(table.remove(a), Some("cube"));
        let b = table.insert("plane");
        assert_ne!(a, b);
        assert_eq!(table.get(a), None);
        assert_eq!(table.get(b), Some(&"plane"));
    }
}
