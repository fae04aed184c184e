use glam::{Vec2, Vec4};

use crate::assets::TextureImage;

/// Bilinear sample with clamp-to-edge addressing, no mipmaps.
///
/// `v = 0` addresses the first stored row.
pub(super) fn sample_linear(tex: &TextureImage, uv: Vec2) -> Vec4 {
    let uv = if uv.is_finite() { uv } else { Vec2::ZERO };
    let x = uv.x * tex.width() as f32 - 0.5;
    let y = uv.y * tex.height() as f32 - 0.5;
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let texel = |dx: i64, dy: i64| Vec4::from(tex.texel(x0 + dx, y0 + dy).map(|c| c as f32 / 255.0));

    let top = texel(0, 0).lerp(texel(1, 0), fx);
    let bottom = texel(0, 1).lerp(texel(1, 1), fx);
    top.lerp(bottom, fy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> TextureImage {
        TextureImage::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap()
    }

    #[test]
    fn texel_centers_are_exact() {
        let tex = two_by_one();
        assert_eq!(sample_linear(&tex, Vec2::new(0.25, 0.5)), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(sample_linear(&tex, Vec2::new(0.75, 0.5)), Vec4::ONE);
    }

    #[test]
    fn midpoint_is_filtered() {
        let s = sample_linear(&two_by_one(), Vec2::new(0.5, 0.5));
        assert!((s.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn outside_range_clamps_to_edge() {
        let tex = two_by_one();
        assert_eq!(sample_linear(&tex, Vec2::new(-3.0, 7.0)), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(sample_linear(&tex, Vec2::new(4.0, -1.0)), Vec4::ONE);
    }
}
