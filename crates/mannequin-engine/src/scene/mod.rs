//! Avatar scene: body-part vocabulary, part placement and the draw stream.
//!
//! Responsibilities:
//! - name the fixed set of parts (`BodyPart`, `DecalSlot`)
//! - place parts from static offsets and per-part sizes (`layout`)
//! - store renderer-agnostic draw commands in paint order (`DrawList`)

mod cmd;
mod list;
mod part;

pub mod layout;

pub use cmd::{CubeCmd, DecalPlaneCmd, DrawCmd, MeshCmd};
pub use layout::{Dimensions, Placement, Rotation};
pub use list::{DrawItem, DrawList, DrawTag};
pub use part::{BodyPart, DecalSlot, UnknownPart};
