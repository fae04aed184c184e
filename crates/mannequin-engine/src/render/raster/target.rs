use glam::Vec4;

use crate::framebuffer::{Framebuffer, RowOrigin};
use crate::paint::{Rgba, unorm8};

/// Color (RGBA8) + depth (f32) attachments, row 0 at the bottom.
#[derive(Debug)]
pub(super) struct Target {
    width: u32,
    height: u32,
    color: Vec<u8>,
    depth: Vec<f32>,
}

impl Target {
    pub(super) fn new(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self { width, height, color: vec![0; n * 4], depth: vec![1.0; n] }
    }

    #[inline]
    pub(super) fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub(super) fn height(&self) -> u32 {
        self.height
    }

    pub(super) fn clear(&mut self, color: Rgba) {
        let px = [unorm8(color.r), unorm8(color.g), unorm8(color.b), unorm8(color.a)];
        for dst in self.color.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
        self.depth.fill(1.0);
    }

    #[inline]
    pub(super) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub(super) fn depth_at(&self, i: usize) -> f32 {
        self.depth[i]
    }

    #[inline]
    pub(super) fn set_depth(&mut self, i: usize, z: f32) {
        self.depth[i] = z;
    }

    #[inline]
    pub(super) fn color_at(&self, i: usize) -> Vec4 {
        let c = &self.color[i * 4..i * 4 + 4];
        Vec4::new(c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32) / 255.0
    }

    #[inline]
    pub(super) fn set_color(&mut self, i: usize, c: Vec4) {
        self.color[i * 4..i * 4 + 4].copy_from_slice(&[unorm8(c.x), unorm8(c.y), unorm8(c.z), unorm8(c.w)]);
    }

    pub(super) fn read_back(&self) -> Framebuffer {
        Framebuffer {
            width: self.width,
            height: self.height,
            origin: RowOrigin::BottomLeft,
            pixels: self.color.clone(),
        }
    }
}
