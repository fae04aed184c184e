use crate::paint::Rgb;
use crate::render::{Mesh, TextureHandle};

use super::Placement;

/// Renderer-agnostic draw command.
///
/// Three operations share one shading program:
/// - `Cube`: indexed unit cube, solid color, never decaled
/// - `Mesh`: un-indexed triangle list (head, hats), optional embedded decal
/// - `DecalPlane`: textured quad blended over an already drawn part
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Cube(CubeCmd),
    Mesh(MeshCmd),
    DecalPlane(DecalPlaneCmd),
}

impl DrawCmd {
    #[inline]
    pub fn mesh(&self) -> Mesh {
        match self {
            DrawCmd::Cube(c) => c.mesh,
            DrawCmd::Mesh(c) => c.mesh,
            DrawCmd::DecalPlane(c) => c.mesh,
        }
    }

    #[inline]
    pub fn placement(&self) -> &Placement {
        match self {
            DrawCmd::Cube(c) => &c.placement,
            DrawCmd::Mesh(c) => &c.placement,
            DrawCmd::DecalPlane(c) => &c.placement,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CubeCmd {
    pub mesh: Mesh,
    pub placement: Placement,
    pub color: Rgb,
    pub lighting: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshCmd {
    pub mesh: Mesh,
    pub placement: Placement,
    pub color: Rgb,
    pub decal: Option<TextureHandle>,
    pub lighting: bool,
}

/// Decal planes are always white-based and always lit.
#[derive(Debug, Clone, PartialEq)]
pub struct DecalPlaneCmd {
    pub mesh: Mesh,
    pub placement: Placement,
    pub texture: TextureHandle,
}
