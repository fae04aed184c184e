//! Framebuffer read-back and conversion to a top-down image.

use anyhow::{Result, ensure};
use image::RgbaImage;

const BYTES_PER_PIXEL: usize = 4;

/// Where row 0 of a read-back buffer sits.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RowOrigin {
    /// Row 0 is the bottom of the image (GL-style surfaces).
    BottomLeft,
    /// Row 0 is the top of the image.
    TopLeft,
}

/// RGBA8 pixels read back from a render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub origin: RowOrigin,
    pub pixels: Vec<u8>,
}

impl Framebuffer {
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Row `y` counted from this buffer's own origin.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.row_bytes();
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }
}

/// Converts a read-back buffer into a top-down RGBA image.
///
/// Bottom-up sources are remapped row by row, `dest(y) = src(height - 1 - y)`.
/// Pixels are copied verbatim: no resampling, no color conversion.
pub fn extract_image(fb: &Framebuffer) -> Result<RgbaImage> {
    let stride = fb.row_bytes();
    let expected = stride * fb.height as usize;
    ensure!(
        fb.pixels.len() == expected,
        "framebuffer {}x{} holds {} bytes, expected {expected}",
        fb.width,
        fb.height,
        fb.pixels.len()
    );

    let data = match fb.origin {
        RowOrigin::TopLeft => fb.pixels.clone(),
        RowOrigin::BottomLeft => {
            let mut out = Vec::with_capacity(expected);
            for src_row in fb.pixels.chunks_exact(stride.max(1)).rev() {
                out.extend_from_slice(src_row);
            }
            out
        }
    };

    RgbaImage::from_raw(fb.width, fb.height, data)
        .ok_or_else(|| anyhow::anyhow!("framebuffer size does not match {}x{}", fb.width, fb.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Buffer with only source row `marked` painted.
    fn marked(width: u32, height: u32, marked: u32, origin: RowOrigin) -> Framebuffer {
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        let stride = (width * 4) as usize;
        for px in pixels[marked as usize * stride..(marked as usize + 1) * stride].chunks_exact_mut(4) {
            px.copy_from_slice(&[255, 10, 20, 255]);
        }
        Framebuffer { width, height, origin, pixels }
    }

    #[test]
    fn bottom_row_becomes_top_row() {
        let fb = marked(3, 4, 0, RowOrigin::BottomLeft);
        let img = extract_image(&fb).unwrap();
        for x in 0..3 {
            assert_eq!(img.get_pixel(x, 3).0, [255, 10, 20, 255]);
            assert_eq!(img.get_pixel(x, 0).0, [0, 0, 0, 0]);
        }
    }

    #[test]
    fn output_row_zero_is_source_last_row() {
        let fb = marked(2, 5, 4, RowOrigin::BottomLeft);
        let img = extract_image(&fb).unwrap();
        assert_eq!(img.get_pixel(1, 0).0, [255, 10, 20, 255]);
        for y in 1..5 {
            assert_eq!(img.get_pixel(1, y).0, [0, 0, 0, 0]);
        }
    }

    #[test]
    fn top_left_source_is_copied_as_is() {
        let fb = marked(2, 3, 1, RowOrigin::TopLeft);
        let img = extract_image(&fb).unwrap();
        assert_eq!(img.as_raw(), &fb.pixels);
    }

    #[test]
    fn non_square_dimensions_are_preserved() {
        let fb = marked(7, 2, 1, RowOrigin::BottomLeft);
        let img = extract_image(&fb).unwrap();
        assert_eq!(img.dimensions(), (7, 2));
        assert_eq!(img.get_pixel(6, 0).0, [255, 10, 20, 255]);
    }

    #[test]
    fn rejects_short_buffer() {
        let fb = Framebuffer { width: 2, height: 2, origin: RowOrigin::BottomLeft, pixels: vec![0; 12] };
        assert!(extract_image(&fb).is_err());
    }
}
