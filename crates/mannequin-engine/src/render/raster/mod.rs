//! CPU rasterizer backend.
//!
//! Deterministic reference implementation of the avatar pipeline: same
//! shading model, blend policy and depth rules as the GPU path, written to a
//! bottom-up RGBA8 target the way a GL default framebuffer is laid out.

mod pipeline;
mod sampler;
mod target;

use anyhow::{Result, ensure};
use slotmap::SlotMap;

use crate::assets::TextureImage;
use crate::framebuffer::Framebuffer;
use crate::geometry::MeshData;
use crate::render::{Backend, DepthMode, DrawState, Mesh, MeshHandle, RenderCtx, TextureHandle};
use crate::scene::DrawList;

use target::Target;

/// Software implementation of [`Backend`].
#[derive(Debug, Default)]
pub struct SoftwareBackend {
    meshes: SlotMap<MeshHandle, MeshData>,
    textures: SlotMap<TextureHandle, TextureImage>,
    target: Option<Target>,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live mesh uploads.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of live texture uploads.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl Backend for SoftwareBackend {
    fn upload_mesh(&mut self, data: &MeshData) -> Result<Mesh> {
        ensure!(!data.is_empty(), "cannot upload an empty mesh");
        if let Some(indices) = &data.indices {
            let n = data.vertices.len();
            ensure!(
                indices.iter().all(|&i| (i as usize) < n),
                "index buffer references vertices past {n}"
            );
        }
        let id = self.meshes.insert(data.clone());
        Ok(Mesh::new(id, data))
    }

    fn release_mesh(&mut self, mesh: Mesh) {
        if self.meshes.remove(mesh.handle()).is_none() {
            log::debug!("release of unknown mesh {:?}", mesh.handle());
        }
    }

    fn upload_texture(&mut self, image: &TextureImage) -> Result<TextureHandle> {
        Ok(self.textures.insert(image.clone()))
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(texture).is_none() {
            log::debug!("release of unknown texture {texture:?}");
        }
    }

    fn execute(&mut self, ctx: &RenderCtx, list: &DrawList) -> Result<Framebuffer> {
        ensure!(ctx.width > 0 && ctx.height > 0, "render target has zero size");

        let Self { meshes, textures, target } = self;
        if target.as_ref().is_some_and(|t| t.width() != ctx.width || t.height() != ctx.height) {
            *target = None;
        }
        let target = target.get_or_insert_with(|| Target::new(ctx.width, ctx.height));
        target.clear(ctx.clear);

        for item in list.iter() {
            let state = DrawState::resolve(&item.cmd, ctx);

            let Some(geometry) = meshes.get(state.mesh.handle()) else {
                log::warn!("{}: mesh {:?} is not resident; skipped", item.tag, state.mesh.handle());
                continue;
            };

            let decal = match state.decal {
                None => None,
                Some(handle) => match textures.get(handle) {
                    Some(tex) => Some(tex),
                    None if state.depth == DepthMode::Overlay => {
                        log::warn!("{}: decal texture {handle:?} is not resident; skipped", item.tag);
                        continue;
                    }
                    None => {
                        log::warn!("{}: decal texture {handle:?} is not resident; drawing without it", item.tag);
                        None
                    }
                },
            };

            pipeline::draw(target, &state, geometry, decal);
        }

        Ok(target.read_back())
    }
}
