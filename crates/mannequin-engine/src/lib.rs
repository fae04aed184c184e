//! Mannequin engine crate.
//!
//! Composites a fixed-topology humanoid avatar (torso, limbs, head, hats)
//! from procedural and loaded meshes, applies per-part colors and decals, and
//! renders a still image through a pluggable [`render::Backend`].

pub mod assets;
pub mod avatar;
pub mod camera;
pub mod device;
pub mod framebuffer;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;

mod renderer;

pub use renderer::{AvatarRenderer, RendererConfig};
