use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
        }
    }
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Length of the shorter side. UV space is normalized by this.
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height) as f32
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Fragment coordinate of a pixel centre.
    ///
    /// `row` counts from the top of the image; fragment coordinates count
    /// from the bottom, the way a rasterizer reports them.
    pub fn frag_coord(&self, column: u32, row: u32) -> Vec2 {
        let flipped = self.height.saturating_sub(1).saturating_sub(row);
        Vec2::new(column as f32 + 0.5, flipped as f32 + 0.5)
    }

    /// Screen UV for a fragment coordinate: centred on the viewport and
    /// scaled so the shorter side spans [-0.5, 0.5].
    pub fn uv(&self, frag: Vec2) -> Vec2 {
        (frag - 0.5 * self.as_vec2()) / self.min_side().max(1.0)
    }
}

/// Per-frame uniform inputs, refreshed once per frame by the clock owner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameParams {
    pub resolution: Resolution,
    /// Seconds since the animation started.
    pub time: f32,
}

impl FrameParams {
    pub fn new(resolution: Resolution, time: f32) -> Self {
        Self { resolution, time }
    }

    /// Screen UV of the pixel at (`column`, `row`), row 0 at the top.
    pub fn pixel_uv(&self, column: u32, row: u32) -> Vec2 {
        self.resolution.uv(self.resolution.frag_coord(column, row))
    }
}

/// A ray with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. A zero direction stays zero.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_is_centred_on_viewport() {
        let res = Resolution::new(800, 600);
        let uv = res.uv(Vec2::new(400.0, 300.0));
        assert_eq!(uv, Vec2::ZERO);

        // Shorter side spans [-0.5, 0.5]
        let top = res.uv(Vec2::new(400.0, 600.0));
        assert!((top.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn frag_coord_flips_rows() {
        let res = Resolution::new(4, 2);
        assert_eq!(res.frag_coord(0, 0), Vec2::new(0.5, 1.5));
        assert_eq!(res.frag_coord(3, 1), Vec2::new(3.5, 0.5));
    }

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn resolution_counts_pixels() {
        let res = Resolution::new(10, 3);
        assert_eq!(res.pixel_count(), 30);
        assert!(!res.is_empty());
        assert!(Resolution::new(0, 3).is_empty());
    }
}
