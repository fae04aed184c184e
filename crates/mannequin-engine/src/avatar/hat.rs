use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::paint::Rgb;
use crate::render::{Mesh, TextureHandle};

/// User-facing hat description (paths plus transform overrides).
///
/// ```json
/// { "mesh": "hats/tophat.obj", "texture": "hats/band.png",
///   "scale": [1.1, 0.6, 1.1], "position": [0, 0.9, 0], "color": [0.1, 0.1, 0.1] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HatDescriptor {
    pub mesh: Option<String>,
    pub texture: Option<String>,
    pub scale: Option<Vec3>,
    pub position: Option<Vec3>,
    /// Defaults to the head color at the time the hat list is set.
    pub color: Option<Rgb>,
}

impl HatDescriptor {
    pub fn new(mesh: impl Into<String>) -> Self {
        Self { mesh: Some(mesh.into()), ..Self::default() }
    }

    pub fn with_texture(mut self, path: impl Into<String>) -> Self {
        self.texture = Some(path.into());
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

/// One hat or a list of hats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HatConfig {
    One(HatDescriptor),
    Many(Vec<HatDescriptor>),
}

impl HatConfig {
    pub fn into_vec(self) -> Vec<HatDescriptor> {
        match self {
            HatConfig::One(h) => vec![h],
            HatConfig::Many(v) => v,
        }
    }
}

impl Default for HatConfig {
    fn default() -> Self {
        HatConfig::Many(Vec::new())
    }
}

impl From<HatDescriptor> for HatConfig {
    fn from(h: HatDescriptor) -> Self {
        HatConfig::One(h)
    }
}

impl From<Vec<HatDescriptor>> for HatConfig {
    fn from(v: Vec<HatDescriptor>) -> Self {
        HatConfig::Many(v)
    }
}

/// A resolved hat. The list order is the render order.
#[derive(Debug, Clone, PartialEq)]
pub struct HatAttachment {
    /// `None` when the mesh failed to load; the hat is kept but not drawn.
    pub mesh: Option<Mesh>,
    pub texture: Option<TextureHandle>,
    pub scale: Vec3,
    pub position: Vec3,
    pub color: Rgb,
}
