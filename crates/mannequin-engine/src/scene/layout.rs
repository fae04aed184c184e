use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::{BodyPart, DecalSlot};

/// Vertical shift applied to every part so the whole avatar can be moved
/// without touching individual offsets.
pub const Y_TRANSLATION: f32 = -0.8;

/// Height of the head's base above the avatar origin (before translation).
pub const HEAD_BASE_HEIGHT: f32 = 2.0;

/// Offset of the torso decal plane in front of the torso surface.
pub const TORSO_DECAL_OFFSET: f32 = 0.01;

/// Offset of the head decal plane in front of the head surface. Larger than
/// the torso's because loaded head meshes are usually not flat-fronted.
pub const HEAD_DECAL_OFFSET: f32 = 0.12;

/// Edge length of the square head decal plane.
pub const HEAD_DECAL_SIZE: f32 = 1.2;

/// Per-part scale factors applied to the unit cube / head mesh.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub torso: Vec3,
    pub limb: Vec3,
    pub head: Vec3,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            torso: Vec3::new(2.0, 2.0, 1.0),
            limb: Vec3::new(1.0, 2.0, 1.0),
            head: Vec3::ONE,
        }
    }
}

/// Axis-angle rotation (radians).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotation {
    pub axis: Vec3,
    pub angle: f32,
}

impl Rotation {
    #[inline]
    pub const fn new(axis: Vec3, angle: f32) -> Self {
        Self { axis, angle }
    }

    #[inline]
    pub const fn y(angle: f32) -> Self {
        Self::new(Vec3::Y, angle)
    }

    fn matrix(self) -> Mat4 {
        match self.axis.try_normalize() {
            Some(axis) => Mat4::from_axis_angle(axis, self.angle),
            None => Mat4::IDENTITY,
        }
    }
}

/// World placement of one drawable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Option<Rotation>,
    pub scale: Vec3,
}

impl Placement {
    #[inline]
    pub const fn new(position: Vec3, scale: Vec3) -> Self {
        Self { position, rotation: None, scale }
    }

    #[inline]
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Model matrix `T · R · S`.
    ///
    /// Scale is applied first in local space, then rotation, then translation.
    /// Changing this order moves parts.
    pub fn model_matrix(&self) -> Mat4 {
        let t = Mat4::from_translation(self.position);
        let r = self.rotation.map_or(Mat4::IDENTITY, Rotation::matrix);
        let s = Mat4::from_scale(self.scale);
        t * r * s
    }
}

/// Local offset of a body part before the global translation.
///
/// The head's offset depends on its height: its center sits half a head above
/// [`HEAD_BASE_HEIGHT`], so resizing the head keeps it resting on the torso.
pub fn local_offset(part: BodyPart, dims: &Dimensions) -> Vec3 {
    match part {
        BodyPart::Torso => Vec3::new(0.0, 1.0, 0.0),
        BodyPart::LeftArm => Vec3::new(-1.5, 1.0, 0.0),
        BodyPart::RightArm => Vec3::new(1.5, 1.0, 0.0),
        BodyPart::LeftLeg => Vec3::new(-0.5, -1.0, 0.0),
        BodyPart::RightLeg => Vec3::new(0.5, -1.0, 0.0),
        BodyPart::Head => head_pivot(dims),
    }
}

/// Head center in avatar space (before the global translation).
#[inline]
pub fn head_pivot(dims: &Dimensions) -> Vec3 {
    Vec3::new(0.0, HEAD_BASE_HEIGHT + dims.head.y / 2.0, 0.0)
}

#[inline]
fn to_world(local: Vec3) -> Vec3 {
    local + Vec3::new(0.0, Y_TRANSLATION, 0.0)
}

/// Size vector used for a body part.
pub fn part_size(part: BodyPart, dims: &Dimensions) -> Vec3 {
    match part {
        BodyPart::Torso => dims.torso,
        BodyPart::Head => dims.head,
        BodyPart::LeftArm | BodyPart::RightArm | BodyPart::LeftLeg | BodyPart::RightLeg => dims.limb,
    }
}

/// World placement of a body part.
pub fn part_placement(part: BodyPart, dims: &Dimensions) -> Placement {
    Placement::new(to_world(local_offset(part, dims)), part_size(part, dims))
}

/// World placement of a hat: its offset rides on the head pivot.
pub fn hat_placement(offset: Vec3, scale: Vec3, dims: &Dimensions) -> Placement {
    Placement::new(to_world(head_pivot(dims) + offset), scale)
}

/// World placement of a decal plane, pushed slightly in front of the part's
/// +Z face so it does not fight the surface underneath.
pub fn decal_placement(slot: DecalSlot, dims: &Dimensions) -> Placement {
    let placement = match slot {
        DecalSlot::Torso => {
            let center = local_offset(BodyPart::Torso, dims);
            Placement::new(
                to_world(Vec3::new(center.x, center.y, dims.torso.z / 2.0 + TORSO_DECAL_OFFSET)),
                Vec3::new(dims.torso.x, dims.torso.y, 1.0),
            )
        }
        DecalSlot::Head => {
            let pivot = head_pivot(dims);
            Placement::new(
                to_world(Vec3::new(pivot.x, pivot.y, dims.head.z / 2.0 + HEAD_DECAL_OFFSET)),
                Vec3::new(HEAD_DECAL_SIZE, HEAD_DECAL_SIZE, 1.0),
            )
        }
    };
    placement.with_rotation(Rotation::y(0.0))
}
