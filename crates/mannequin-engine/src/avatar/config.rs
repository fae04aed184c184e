use std::ops::{Index, IndexMut};

use crate::paint::Rgb;
use crate::render::{Mesh, TextureHandle};
use crate::scene::{BodyPart, DecalSlot};

/// Base color of every body part. Total: there is always a color per part.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PartColors {
    colors: [Rgb; 6],
}

impl PartColors {
    #[inline]
    pub fn get(&self, part: BodyPart) -> Rgb {
        self[part]
    }

    #[inline]
    pub fn set(&mut self, part: BodyPart, color: Rgb) {
        self[part] = color;
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyPart, Rgb)> + '_ {
        BodyPart::ALL.into_iter().map(|p| (p, self[p]))
    }

    #[inline]
    fn slot(part: BodyPart) -> usize {
        match part {
            BodyPart::Head => 0,
            BodyPart::Torso => 1,
            BodyPart::LeftArm => 2,
            BodyPart::RightArm => 3,
            BodyPart::LeftLeg => 4,
            BodyPart::RightLeg => 5,
        }
    }
}

impl Default for PartColors {
    fn default() -> Self {
        let limb = Rgb::new(0.2, 0.2, 0.7);
        Self {
            colors: [Rgb::new(1.0, 1.0, 0.0), Rgb::new(0.7, 0.2, 0.2), limb, limb, limb, limb],
        }
    }
}

impl Index<BodyPart> for PartColors {
    type Output = Rgb;

    fn index(&self, part: BodyPart) -> &Rgb {
        &self.colors[Self::slot(part)]
    }
}

impl IndexMut<BodyPart> for PartColors {
    fn index_mut(&mut self, part: BodyPart) -> &mut Rgb {
        &mut self.colors[Self::slot(part)]
    }
}

/// Resolved look of the avatar body (hats live beside it in the renderer).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvatarConfig {
    pub colors: PartColors,
    pub head_decal: Option<TextureHandle>,
    pub torso_decal: Option<TextureHandle>,
    /// `None` when the head mesh failed to load; the head is then not drawn.
    pub head_mesh: Option<Mesh>,
}

impl AvatarConfig {
    #[inline]
    pub fn decal(&self, slot: DecalSlot) -> Option<TextureHandle> {
        match slot {
            DecalSlot::Head => self.head_decal,
            DecalSlot::Torso => self.torso_decal,
        }
    }

    #[inline]
    pub fn decal_mut(&mut self, slot: DecalSlot) -> &mut Option<TextureHandle> {
        match slot {
            DecalSlot::Head => &mut self.head_decal,
            DecalSlot::Torso => &mut self.torso_decal,
        }
    }
}
