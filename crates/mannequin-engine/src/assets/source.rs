use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{LoadError, TextureImage};

/// Provider of raw mesh bytes and decoded textures, keyed by path-like strings.
pub trait AssetSource {
    /// Returns the raw bytes stored under `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, LoadError>;

    /// Loads and decodes a texture. The default implementation decodes the
    /// bytes from [`read`](Self::read) with the `image` crate.
    fn load_texture(&self, path: &str) -> Result<TextureImage, LoadError> {
        let bytes = self.read(path)?;
        TextureImage::decode(path, &bytes)
    }
}

/// Filesystem-backed assets. Relative paths resolve against `root`.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() { p.to_path_buf() } else { self.root.join(p) }
    }
}

impl AssetSource for DirAssets {
    fn read(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let full = self.resolve(path);
        if !full.is_file() {
            return Err(LoadError::NotFound { path: full.display().to_string() });
        }
        std::fs::read(&full).map_err(|source| LoadError::Io {
            path: full.display().to_string(),
            source,
        })
    }
}

/// In-memory assets: raw files plus pre-decoded textures.
///
/// Textures inserted with [`insert_texture`](Self::insert_texture) bypass the
/// codec; anything else under a path is decoded on load.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
    textures: HashMap<String, TextureImage>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.files.insert(path.into(), bytes.into());
        self
    }

    pub fn insert_texture(&mut self, path: impl Into<String>, texture: TextureImage) -> &mut Self {
        self.textures.insert(path.into(), texture);
        self
    }

    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn with_texture(mut self, path: impl Into<String>, texture: TextureImage) -> Self {
        self.insert_texture(path, texture);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn read(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound { path: path.to_string() })
    }

    fn load_texture(&self, path: &str) -> Result<TextureImage, LoadError> {
        match self.textures.get(path) {
            Some(tex) => Ok(tex.clone()),
            None => TextureImage::decode(path, &self.read(path)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_assets_reports_missing_file() {
        let assets = DirAssets::new(std::env::temp_dir());
        let err = assets.read("definitely-not-here-7f3a.obj").unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn dir_assets_reads_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("mannequin-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hat.obj"), b"v 0 0 0\n").unwrap();

        let assets = DirAssets::new(&dir);
        assert_eq!(assets.read("hat.obj").unwrap(), b"v 0 0 0\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn memory_assets_prefers_decoded_textures() {
        let tex = TextureImage::solid(1, 1, [9, 9, 9, 9]);
        let assets = MemoryAssets::new().with_texture("face.png", tex.clone());
        assert_eq!(assets.load_texture("face.png").unwrap(), tex);
        assert!(matches!(assets.load_texture("other.png"), Err(LoadError::NotFound { .. })));
    }
}
