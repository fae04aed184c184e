use crate::assets::{AssetSource, LoadError};
use crate::geometry::parse_obj;
use crate::render::{Backend, Mesh, TextureHandle};

/// Loads, parses and uploads a mesh. Any failure is logged and yields `None`.
pub fn resolve_mesh<B: Backend + ?Sized>(backend: &mut B, assets: &dyn AssetSource, path: &str) -> Option<Mesh> {
    let data = match assets.read(path).and_then(|bytes| parse_obj(&bytes)) {
        Ok(data) => data,
        Err(LoadError::EmptyMesh) => {
            log::warn!("mesh {path} contains no vertices; it will not be drawn");
            return None;
        }
        Err(err) => {
            log::error!("failed to load mesh {path}: {err}");
            return None;
        }
    };

    match backend.upload_mesh(&data) {
        Ok(mesh) => {
            log::debug!("mesh {path}: {} vertices", mesh.vertex_count());
            Some(mesh)
        }
        Err(err) => {
            log::error!("failed to upload mesh {path}: {err:#}");
            None
        }
    }
}

/// Loads, decodes and uploads a texture. Any failure is logged and yields `None`.
pub fn resolve_texture<B: Backend + ?Sized>(
    backend: &mut B,
    assets: &dyn AssetSource,
    path: &str,
) -> Option<TextureHandle> {
    let image = match assets.load_texture(path) {
        Ok(image) => image,
        Err(err) => {
            log::error!("failed to load texture {path}: {err}");
            return None;
        }
    };

    match backend.upload_texture(&image) {
        Ok(handle) => {
            log::debug!("texture {path}: {}x{}", image.width(), image.height());
            Some(handle)
        }
        Err(err) => {
            log::error!("failed to upload texture {path}: {err:#}");
            None
        }
    }
}
