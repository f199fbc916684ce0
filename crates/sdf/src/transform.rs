use glam::Vec3;

/// Rotate `p` about the Y axis.
///
/// Maps `(x, z)` to `(c*x - s*z, s*x + c*z)`. Scene layouts depend on this
/// exact handedness.
#[inline]
pub fn rotate_y(p: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * p.x - s * p.z, p.y, s * p.x + c * p.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn() {
        let r = rotate_y(Vec3::new(1.0, 2.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!((r - Vec3::new(0.0, 2.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn preserves_length() {
        let p = Vec3::new(0.3, -1.2, 4.0);
        assert!((rotate_y(p, 1.234).length() - p.length()).abs() < 1e-5);
    }
}
