use glam::Vec3;
use papillon_sdf::DistanceField;

/// Surface normal from central differences of the field, six evaluations.
///
/// Returns `Vec3::ZERO` where the gradient vanishes or is not finite.
pub fn estimate_normal<F>(field: &F, p: Vec3, time: f32, epsilon: f32) -> Vec3
where
    F: DistanceField + ?Sized,
{
    let dx = Vec3::new(epsilon, 0.0, 0.0);
    let dy = Vec3::new(0.0, epsilon, 0.0);
    let dz = Vec3::new(0.0, 0.0, epsilon);
    let gradient = Vec3::new(
        field.distance(p + dx, time) - field.distance(p - dx, time),
        field.distance(p + dy, time) - field.distance(p - dy, time),
        field.distance(p + dz, time) - field.distance(p - dz, time),
    );
    gradient.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use papillon_sdf::primitives::{plane, sphere};

    #[test]
    fn recovers_plane_normal_anywhere_on_the_plane() {
        let n = Vec3::new(1.0, 2.0, -0.5).normalize();
        let offset = 0.3;
        let field = move |p: Vec3, _t: f32| plane(p, n, offset);

        let u = n.any_orthonormal_vector();
        let v = n.cross(u);
        let origin = -offset * n;
        for (a, b) in [
            (0.0, 0.0),
            (0.4, -0.1),
            (-3.0, 2.5),
            (12.0, 0.0),
            (0.0, -18.0),
            (20.0, 20.0),
        ] {
            let p = origin + a * u + b * v;
            assert!(field(p, 0.0).abs() < 1e-4, "({a}, {b}) should lie on the plane");
            let estimated = estimate_normal(&field, p, 0.0, 1e-2);
            assert!(
                (estimated - n).length() < 1e-3,
                "normal at ({a}, {b}) was {estimated}"
            );
        }
    }

    #[test]
    fn sphere_normal_points_outward() {
        let field = |p: Vec3, _t: f32| sphere(p, 1.0);
        let estimated = estimate_normal(&field, Vec3::new(0.0, 0.0, 1.0), 0.0, 1e-3);
        assert!((estimated - Vec3::Z).length() < 1e-3);
    }

    #[test]
    fn flat_field_has_no_normal() {
        let field = |_: Vec3, _: f32| 1.0_f32;
        assert_eq!(estimate_normal(&field, Vec3::ZERO, 0.0, 1e-3), Vec3::ZERO);
    }
}
