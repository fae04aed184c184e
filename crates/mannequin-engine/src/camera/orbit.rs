use std::f32::consts::PI;

use anyhow::{Result, ensure};
use glam::{Mat4, Vec3};

/// Spherical orbit parameters around `target`.
///
/// `polar` is measured from +Y, `azimuth` from +Z towards +X.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitParams {
    pub radius: f32,
    pub polar: f32,
    pub azimuth: f32,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            radius: 8.0,
            polar: PI / 3.7,
            azimuth: PI / 5.0,
            target: Vec3::new(0.0, 1.0, 0.0),
            fov_y: PI / 4.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl OrbitParams {
    /// Rejects orbits that cannot produce a view: non-finite values, a
    /// non-positive radius, a bad frustum, or an eye straight above or below
    /// the target where the up vector is undefined.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.radius.is_finite() && self.radius > 0.0,
            "orbit radius must be positive, got {}",
            self.radius
        );
        ensure!(
            self.polar.is_finite() && self.azimuth.is_finite() && self.target.is_finite(),
            "orbit angles and target must be finite"
        );
        ensure!(
            self.fov_y > 0.0 && self.fov_y < PI,
            "field of view must be in (0, pi), got {}",
            self.fov_y
        );
        ensure!(
            self.near > 0.0 && self.far > self.near,
            "clip range must satisfy 0 < near < far, got {}..{}",
            self.near,
            self.far
        );
        let forward = (self.target - self.eye()).normalize_or_zero();
        ensure!(
            forward.cross(Vec3::Y).length_squared() > 1e-8,
            "eye at polar {} looks along the up axis",
            self.polar
        );
        Ok(())
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        Vec3::new(
            self.radius * sin_p * sin_a,
            self.radius * cos_p,
            self.radius * sin_p * cos_a,
        )
    }
}

/// Immutable camera state: view, projection and headlight direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    eye: Vec3,
    view: Mat4,
    projection: Mat4,
    light_dir: Vec3,
}

impl Camera {
    /// Builds the camera for a `width` x `height` output.
    ///
    /// The light points along the normalized eye position, so it always comes
    /// from the viewer's side of the avatar.
    pub fn orbit(params: &OrbitParams, width: u32, height: u32) -> Self {
        let eye = params.eye();
        let aspect = width.max(1) as f32 / height.max(1) as f32;

        let view = Mat4::look_at_rh(eye, params.target, Vec3::Y);
        let projection = Mat4::perspective_rh(params.fov_y, aspect, params.near, params.far);

        Self {
            eye,
            view,
            projection,
            light_dir: eye.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    #[inline]
    pub fn light_dir(&self) -> Vec3 {
        self.light_dir
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4Swizzles;

    use super::*;

    #[test]
    fn default_eye_matches_spherical_coordinates() {
        let eye = OrbitParams::default().eye();
        let phi = PI / 3.7;
        let theta = PI / 5.0;
        assert!((eye.x - 8.0 * phi.sin() * theta.sin()).abs() < 1e-5);
        assert!((eye.y - 8.0 * phi.cos()).abs() < 1e-5);
        assert!((eye.z - 8.0 * phi.sin() * theta.cos()).abs() < 1e-5);
        assert!((eye.length() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn default_orbit_is_valid() {
        assert!(OrbitParams::default().validate().is_ok());
    }

    #[test]
    fn degenerate_orbits_are_rejected() {
        let base = OrbitParams::default();
        for bad in [
            OrbitParams { polar: 0.0, ..base },
            OrbitParams { polar: PI, ..base },
            OrbitParams { radius: 0.0, ..base },
            OrbitParams { radius: -1.0, ..base },
            OrbitParams { azimuth: f32::NAN, ..base },
            OrbitParams { near: 0.0, ..base },
            OrbitParams { far: 0.05, ..base },
        ] {
            assert!(bad.validate().is_err(), "{bad:?} was accepted");
        }
    }

    #[test]
    fn light_is_normalized_eye() {
        let cam = Camera::orbit(&OrbitParams::default(), 512, 512);
        assert!((cam.light_dir().length() - 1.0).abs() < 1e-6);
        assert!(cam.light_dir().dot(cam.eye().normalize()) > 0.9999);
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = Camera::orbit(&OrbitParams::default(), 640, 480);
        let clip = cam.view_projection() * Vec3::new(0.0, 1.0, 0.0).extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
