use glam::{Mat4, Vec3};

use crate::paint::Rgb;
use crate::scene::DrawCmd;

use super::{Mesh, RenderCtx, TextureHandle};

/// Depth policy of a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DepthMode {
    /// Depth write on, passes when strictly closer.
    Opaque,
    /// Depth write off, passes when closer or equal. Used only for decal planes.
    Overlay,
}

impl DepthMode {
    #[inline]
    pub fn writes_depth(self) -> bool {
        matches!(self, DepthMode::Opaque)
    }

    #[inline]
    pub fn passes(self, incoming: f32, stored: f32) -> bool {
        match self {
            DepthMode::Opaque => incoming < stored,
            DepthMode::Overlay => incoming <= stored,
        }
    }
}

/// A draw command resolved into shader inputs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawState {
    pub mesh: Mesh,
    pub mvp: Mat4,
    pub model: Mat4,
    pub color: Rgb,
    /// Zero when lighting is disabled for the draw.
    pub light_dir: Vec3,
    pub decal: Option<TextureHandle>,
    pub depth: DepthMode,
}

impl DrawState {
    pub fn resolve(cmd: &DrawCmd, ctx: &RenderCtx) -> Self {
        let model = cmd.placement().model_matrix();
        let mvp = ctx.view_projection * model;
        let light = |on: bool| if on { ctx.light_dir } else { Vec3::ZERO };

        match cmd {
            DrawCmd::Cube(c) => Self {
                mesh: c.mesh,
                mvp,
                model,
                color: c.color,
                light_dir: light(c.lighting),
                decal: None,
                depth: DepthMode::Opaque,
            },
            DrawCmd::Mesh(c) => Self {
                mesh: c.mesh,
                mvp,
                model,
                color: c.color,
                light_dir: light(c.lighting),
                decal: c.decal,
                depth: DepthMode::Opaque,
            },
            DrawCmd::DecalPlane(c) => Self {
                mesh: c.mesh,
                mvp,
                model,
                color: Rgb::white(),
                light_dir: ctx.light_dir,
                decal: Some(c.texture),
                depth: DepthMode::Overlay,
            },
        }
    }
}
