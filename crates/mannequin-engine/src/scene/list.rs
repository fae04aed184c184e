use std::fmt;

use super::DrawCmd;

/// What a draw item renders. Used for ordering checks and diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawTag {
    Torso,
    TorsoDecal,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    Head,
    HeadDecal,
    /// Hat at this index of the hat list.
    Hat(usize),
}

impl fmt::Display for DrawTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawTag::Torso => f.write_str("torso"),
            DrawTag::TorsoDecal => f.write_str("torso decal"),
            DrawTag::LeftArm => f.write_str("left arm"),
            DrawTag::RightArm => f.write_str("right arm"),
            DrawTag::LeftLeg => f.write_str("left leg"),
            DrawTag::RightLeg => f.write_str("right leg"),
            DrawTag::Head => f.write_str("head"),
            DrawTag::HeadDecal => f.write_str("head decal"),
            DrawTag::Hat(i) => write!(f, "hat #{i}"),
        }
    }
}

/// A single draw item.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub tag: DrawTag,
    pub cmd: DrawCmd,
}

/// Recorded draw stream for a frame.
///
/// Items execute strictly in insertion order: overlays rely on what was drawn
/// before them, so there is no sorting.
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    items: Vec<DrawItem>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, tag: DrawTag, cmd: DrawCmd) {
        self.items.push(DrawItem { tag, cmd });
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DrawItem> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Tags in paint order.
    pub fn tags(&self) -> Vec<DrawTag> {
        self.items.iter().map(|i| i.tag).collect()
    }
}
