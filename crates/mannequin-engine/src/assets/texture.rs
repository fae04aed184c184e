use super::LoadError;

/// Decoded RGBA8 texture, rows stored top-down (row 0 is the top of the image).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    /// Wraps raw RGBA8 pixels. Fails if the buffer does not hold exactly
    /// `width * height * 4` bytes or either dimension is zero.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, LoadError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(LoadError::Malformed {
                reason: format!(
                    "texture {width}x{height} needs {expected} bytes, got {}",
                    pixels.len()
                ),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Single-color texture.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba.repeat(width.max(1) as usize * height.max(1) as usize);
        Self { width: width.max(1), height: height.max(1), pixels }
    }

    /// Decodes any format supported by the `image` crate and converts to RGBA8.
    ///
    /// `path` is only used for error reporting.
    pub fn decode(path: &str, bytes: &[u8]) -> Result<Self, LoadError> {
        let img = image::load_from_memory(bytes).map_err(|e| LoadError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from(img.to_rgba8()))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Texel at integer coordinates, clamped to the edge.
    #[inline]
    pub fn texel(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }
}

impl From<image::RgbaImage> for TextureImage {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height, pixels: img.into_raw() }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert!(TextureImage::new(2, 2, vec![0; 15]).is_err());
        assert!(TextureImage::new(0, 2, vec![]).is_err());
        assert!(TextureImage::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn decodes_png() {
        let mut img = image::RgbaImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, image::Rgba([0, 0, 255, 128]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();

        let tex = TextureImage::decode("face.png", &bytes).unwrap();
        assert_eq!((tex.width(), tex.height()), (2, 1));
        assert_eq!(tex.texel(1, 0), [0, 0, 255, 128]);
    }

    #[test]
    fn garbage_fails_to_decode() {
        let err = TextureImage::decode("face.png", b"not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn texel_clamps_to_edge() {
        let tex = TextureImage::new(2, 1, vec![1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
        assert_eq!(tex.texel(-5, 0), [1, 1, 1, 1]);
        assert_eq!(tex.texel(9, 3), [2, 2, 2, 2]);
    }
}
