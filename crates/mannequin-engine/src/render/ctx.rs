use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::paint::Rgba;

/// Per-frame render context handed to a backend.
///
/// Built from the renderer's immutable camera; backends never derive camera
/// state themselves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderCtx {
    pub width: u32,
    pub height: u32,
    pub clear: Rgba,
    pub view_projection: Mat4,
    pub light_dir: Vec3,
}

impl RenderCtx {
    #[inline]
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear: Rgba::transparent(),
            view_projection: camera.view_projection(),
            light_dir: camera.light_dir(),
        }
    }
}
