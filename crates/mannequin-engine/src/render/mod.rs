//! Rendering subsystem.
//!
//! Backends consume `scene` draw streams and produce a framebuffer.
//! Each backend is responsible for its own resources (buffers, textures,
//! pipelines) behind opaque handles.
//!
//! Convention:
//! - world space is right-handed, +Y up
//! - clip-space depth is `[0, 1]`, cleared to 1
//! - all draws blend `src·a + dst·(1 − a)`

mod backend;
mod ctx;
mod handles;
mod state;

pub mod raster;
pub mod shading;

pub use backend::Backend;
pub use ctx::RenderCtx;
pub use handles::{Mesh, MeshHandle, TextureHandle};
pub use state::{DepthMode, DrawState};

