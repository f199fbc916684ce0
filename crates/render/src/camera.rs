use glam::{Vec2, Vec3};
use papillon_common::Ray;
use serde::{Deserialize, Serialize};

/// Pinhole camera. Rays leave `origin` through an image plane `focal_length`
/// in front of it, with screen UV mapped onto the plane's right/up axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub origin: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub focal_length: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            focal_length: 1.0,
        }
    }
}

impl Camera {
    /// Orthonormal `(forward, right, up)` frame.
    ///
    /// Falls back to world axes when `target` coincides with `origin` or
    /// `up` is parallel to the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.origin)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z);
        let right = forward.cross(self.up).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        (forward, right, up)
    }

    /// Primary ray through screen coordinate `uv`.
    pub fn ray(&self, uv: Vec2) -> Ray {
        let (forward, right, up) = self.basis();
        self.ray_in_basis(uv, forward, right, up)
    }

    /// Same as [`Camera::ray`] with a precomputed basis, for per-pixel loops.
    #[inline]
    pub fn ray_in_basis(&self, uv: Vec2, forward: Vec3, right: Vec3, up: Vec3) -> Ray {
        Ray::new(
            self.origin,
            right * uv.x + up * uv.y + forward * self.focal_length,
        )
    }
}
