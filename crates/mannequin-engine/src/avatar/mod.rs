//! Material/decal resolution: what each body part looks like.
//!
//! Holds the per-part colors, decal textures, head mesh and hat list, and
//! turns asset paths into backend resources. Loading failures never escape
//! this layer: they are logged and the resource becomes absent.

mod config;
mod hat;
mod resolve;

pub use config::{AvatarConfig, PartColors};
pub use hat::{HatAttachment, HatConfig, HatDescriptor};
pub use resolve::{resolve_mesh, resolve_texture};
