//! The avatar shading model, shared by the CPU rasterizer and mirrored by
//! `device/shaders/avatar.wgsl`.
//!
//! ```text
//! unlit = decal ? mix(color, decal.rgb, decal.a) : color
//! lit   = unlit * (AMBIENT + DIFFUSE_GAIN * max(dot(n, l), 0))
//! alpha = decal ? decal.a : 1
//! ```

use glam::{Vec3, Vec4, Vec4Swizzles};

/// Light floor applied regardless of orientation.
pub const AMBIENT: f32 = 0.3;

/// Gain on the Lambert term.
pub const DIFFUSE_GAIN: f32 = 1.2;

/// Composites a decal sample over the base color: `C·(1−a) + D·a`.
#[inline]
pub fn blend_decal(base: Vec3, decal: Vec4) -> Vec3 {
    let a = decal.w;
    base * (1.0 - a) + decal.xyz() * a
}

/// Clamped Lambert term. Zero-length vectors contribute nothing, so a zeroed
/// light leaves only the ambient floor.
#[inline]
pub fn diffuse(normal: Vec3, light_dir: Vec3) -> f32 {
    normal.normalize_or_zero().dot(light_dir.normalize_or_zero()).max(0.0)
}

#[inline]
pub fn light(unlit: Vec3, normal: Vec3, light_dir: Vec3) -> Vec3 {
    unlit * (AMBIENT + DIFFUSE_GAIN * diffuse(normal, light_dir))
}

/// Full fragment: straight-alpha RGBA, unclamped.
#[inline]
pub fn fragment(color: Vec3, decal: Option<Vec4>, normal: Vec3, light_dir: Vec3) -> Vec4 {
    let (unlit, alpha) = match decal {
        Some(d) => (blend_decal(color, d), d.w),
        None => (color, 1.0),
    };
    light(unlit, normal, light_dir).extend(alpha)
}

/// `src·src.a + dst·(1 − src.a)` on all four channels.
#[inline]
pub fn blend_over(src: Vec4, dst: Vec4) -> Vec4 {
    let a = src.w;
    src * a + dst * (1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: Vec3 = Vec3::new(0.7, 0.2, 0.2);
    const D: Vec3 = Vec3::new(0.1, 0.9, 0.4);

    #[test]
    fn decal_blend_endpoints_are_exact() {
        assert_eq!(blend_decal(C, D.extend(0.0)), C);
        assert_eq!(blend_decal(C, D.extend(1.0)), D);
    }

    #[test]
    fn decal_blend_is_linear_in_alpha() {
        let a = 0.25;
        let got = blend_decal(C, D.extend(a));
        let want = C * (1.0 - a) + D * a;
        assert!((got - want).abs().max_element() < 1e-6);
    }

    #[test]
    fn zero_light_is_pure_ambient() {
        let lit = light(C, Vec3::Z, Vec3::ZERO);
        assert_eq!(lit, C * AMBIENT);
    }

    #[test]
    fn facing_light_gets_full_gain() {
        let lit = light(Vec3::ONE, Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!((lit - Vec3::splat(AMBIENT + DIFFUSE_GAIN)).abs().max_element() < 1e-6);
    }

    #[test]
    fn back_facing_is_clamped() {
        assert_eq!(diffuse(-Vec3::Z, Vec3::Z), 0.0);
        assert_eq!(diffuse(Vec3::ZERO, Vec3::Z), 0.0);
    }

    #[test]
    fn fragment_alpha_follows_decal() {
        assert_eq!(fragment(C, None, Vec3::Z, Vec3::Z).w, 1.0);
        assert_eq!(fragment(C, Some(D.extend(0.4)), Vec3::Z, Vec3::Z).w, 0.4);
    }

    #[test]
    fn opaque_source_replaces_destination() {
        let src = Vec4::new(0.2, 0.4, 0.6, 1.0);
        assert_eq!(blend_over(src, Vec4::new(1.0, 1.0, 1.0, 1.0)), src);
    }
}
