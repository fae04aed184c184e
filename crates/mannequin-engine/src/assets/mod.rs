//! Asset loading boundary.
//!
//! The engine never touches the filesystem or image codecs directly from the
//! renderer; it asks an [`AssetSource`] for bytes and decoded textures and
//! receives a `Result<_, LoadError>`. The resolver layer turns failures into
//! "absent resource" and keeps rendering.

mod error;
mod source;
mod texture;

pub use error::LoadError;
pub use source::{AssetSource, DirAssets, MemoryAssets};
pub use texture::TextureImage;
