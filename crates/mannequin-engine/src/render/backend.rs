use anyhow::Result;

use crate::assets::TextureImage;
use crate::framebuffer::Framebuffer;
use crate::geometry::MeshData;
use crate::scene::DrawList;

use super::{Mesh, RenderCtx, TextureHandle};

/// Graphics-context capability consumed by the avatar renderer.
///
/// A backend owns every GPU-side resource it hands out. Handles stay valid
/// until released; the renderer uploads once and reuses them across renders.
///
/// `execute` runs a whole frame: clear color + depth, draw `list` in order,
/// read the color target back. Implementations are single-threaded; callers
/// serialize access through `&mut self`.
pub trait Backend {
    /// Uploads interleaved geometry. Empty geometry is rejected.
    fn upload_mesh(&mut self, data: &MeshData) -> Result<Mesh>;

    fn release_mesh(&mut self, mesh: Mesh);

    /// Uploads an RGBA8 texture sampled with clamp-to-edge addressing and
    /// linear filtering, without mipmaps.
    fn upload_texture(&mut self, image: &TextureImage) -> Result<TextureHandle>;

    fn release_texture(&mut self, texture: TextureHandle);

    fn execute(&mut self, ctx: &RenderCtx, list: &DrawList) -> Result<Framebuffer>;
}
