//! JSON avatar description.
//!
//! ```json
//! {
//!   "colors": { "torso": [0.1, 0.5, 0.1], "leftLeg": [1, 0, 0] },
//!   "decals": { "torso": "shirt.png", "head": "face.png" },
//!   "hats": { "mesh": "hat.obj", "position": [0, 0.8, 0] },
//!   "dimensions": { "head": [1.2, 1, 1.2] }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use mannequin_engine::avatar::HatConfig;
use mannequin_engine::paint::Rgb;
use mannequin_engine::render::Backend;
use mannequin_engine::scene::Dimensions;
use mannequin_engine::AvatarRenderer;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvatarFile {
    pub colors: BTreeMap<String, Rgb>,
    pub decals: BTreeMap<String, String>,
    pub hats: Option<HatConfig>,
    pub dimensions: Option<Dimensions>,
}

impl AvatarFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid avatar description {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Applies the description. Dimensions go first so hats and decals are
    /// placed against the final sizes.
    pub fn apply<B: Backend>(self, renderer: &mut AvatarRenderer<B>) {
        if let Some(dims) = self.dimensions {
            renderer.set_dimensions(dims);
        }
        for (key, color) in self.colors {
            renderer.set_part_color(&key, color);
        }
        for (key, path) in &self.decals {
            renderer.set_part_decal(key, path);
        }
        // Hat colors default to the head color, so colors must be set first.
        if let Some(hats) = self.hats {
            renderer.set_hat(hats);
        }
    }
}
