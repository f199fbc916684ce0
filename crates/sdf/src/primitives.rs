//! Exact signed distance functions.
//!
//! Each takes the query point already expressed in the primitive's local
//! frame and returns a signed distance: negative inside, zero on the
//! surface, positive outside.

use glam::{Vec2, Vec3};

#[inline]
fn valid_size(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

/// Sphere centred at the origin.
#[inline]
pub fn sphere(p: Vec3, radius: f32) -> f32 {
    if !valid_size(radius) {
        return f32::INFINITY;
    }
    p.length() - radius
}

/// Axis-aligned box centred at the origin. Exact inside and outside.
#[inline]
pub fn box3(p: Vec3, half_extents: Vec3) -> f32 {
    if !half_extents.is_finite() || half_extents.min_element() < 0.0 {
        return f32::INFINITY;
    }
    let d = p.abs() - half_extents;
    d.max(Vec3::ZERO).length() + d.max_element().min(0.0)
}

/// Infinite plane `dot(p, normal) + offset = 0`.
///
/// `normal` must be unit length; any other length scales the distance.
#[inline]
pub fn plane(p: Vec3, normal: Vec3, offset: f32) -> f32 {
    p.dot(normal) + offset
}

/// Hollow box: material only along the twelve edges, `edge` thick.
#[inline]
pub fn box_frame(p: Vec3, half_extents: Vec3, edge: f32) -> f32 {
    if !half_extents.is_finite() || half_extents.min_element() < 0.0 || !valid_size(edge) {
        return f32::INFINITY;
    }
    let p = p.abs() - half_extents;
    let q = (p + edge).abs() - edge;

    let beam = |v: Vec3| v.max(Vec3::ZERO).length() + v.max_element().min(0.0);
    beam(Vec3::new(p.x, q.y, q.z))
        .min(beam(Vec3::new(q.x, p.y, q.z)))
        .min(beam(Vec3::new(q.x, q.y, p.z)))
}

/// Lens-shaped solid swept along `a -> b` with the given half width.
///
/// The lens is centred at `(a + b) * 0.3`, not the segment midpoint; wing
/// panels anchored at the origin rely on that offset. In the (radial, axial)
/// half-plane the closest feature is either the pointed tip `(0, r)` or the
/// bounding circle centred at `(-d, 0)` with radius `d + w`.
///
/// Zero-length or non-finite segments and non-positive widths have no
/// surface and return `f32::INFINITY`.
#[inline]
pub fn vesica_segment(p: Vec3, a: Vec3, b: Vec3, half_width: f32) -> f32 {
    let ab = b - a;
    let l = ab.length();
    if !l.is_finite() || l <= f32::EPSILON || !half_width.is_finite() || half_width <= 0.0 {
        return f32::INFINITY;
    }
    let w = half_width;
    let c = (a + b) * 0.3;
    let v = ab / l;
    let pc = p - c;
    let y = pc.dot(v);
    let q = Vec2::new((pc - y * v).length(), y.abs());

    let r = 0.5 * l;
    let d = 0.5 * (r * r - w * w) / w;
    let (h, radius) = if r * q.x < d * (q.y - r) {
        (Vec2::new(0.0, r), 0.0)
    } else {
        (Vec2::new(-d, 0.0), d + w)
    };

    (q - h).length() - radius
}

/// Capped cylinder along the Y axis.
#[inline]
pub fn cylinder(p: Vec3, half_height: f32, radius: f32) -> f32 {
    if !valid_size(half_height) || !valid_size(radius) {
        return f32::INFINITY;
    }
    let d = Vec2::new(Vec2::new(p.x, p.z).length(), p.y).abs() - Vec2::new(radius, half_height);
    d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-4;

    #[test]
    fn sphere_surface_and_interior() {
        assert!(sphere(Vec3::new(0.0, 2.0, 0.0), 2.0).abs() < TOL);
        assert!((sphere(Vec3::ZERO, 1.5) + 1.5).abs() < TOL);
        assert!((sphere(Vec3::new(3.0, 0.0, 0.0), 1.0) - 2.0).abs() < TOL);
    }

    #[test]
    fn box_surface_inside_outside() {
        let b = Vec3::new(1.0, 2.0, 3.0);
        assert!(box3(Vec3::new(1.0, 0.5, -1.0), b).abs() < TOL);
        assert!(box3(Vec3::new(0.3, -2.0, 0.0), b).abs() < TOL);
        // Inside: distance to the nearest face
        assert!((box3(Vec3::ZERO, b) + 1.0).abs() < TOL);
        // Outside past a corner
        let d = box3(Vec3::new(2.0, 3.0, 3.0), b);
        assert!((d - 2.0_f32.sqrt()).abs() < TOL);
    }

    #[test]
    fn plane_distance_is_signed() {
        let n = Vec3::Y;
        assert!(plane(Vec3::new(7.0, -1.0, 3.0), n, 1.0).abs() < TOL);
        assert!((plane(Vec3::new(0.0, 2.0, 0.0), n, 1.0) - 3.0).abs() < TOL);
        assert!(plane(Vec3::new(0.0, -4.0, 0.0), n, 1.0) < 0.0);
    }

    #[test]
    fn box_frame_edges_and_hollow() {
        let b = Vec3::splat(1.0);
        assert!(box_frame(Vec3::new(1.0, 1.0, 0.0), b, 0.1).abs() < TOL);
        assert!(box_frame(Vec3::new(0.0, -1.0, 1.0), b, 0.1).abs() < TOL);
        // Face centre is empty space
        assert!(box_frame(Vec3::new(1.0, 0.0, 0.0), b, 0.1) > 0.5);
        assert!(box_frame(Vec3::ZERO, b, 0.1) > 0.0);
        assert!(box_frame(Vec3::new(0.95, 0.95, 0.0), b, 0.1) < 0.0);
    }

    #[test]
    fn vesica_tip_and_equator_lie_on_surface() {
        let a = Vec3::ZERO;
        let b = Vec3::new(2.0, 0.0, 0.0);
        let w = 0.25;
        let c = (a + b) * 0.3;
        let r = 1.0;

        // Tips along the axis
        assert!(vesica_segment(c + Vec3::new(r, 0.0, 0.0), a, b, w).abs() < TOL);
        assert!(vesica_segment(c - Vec3::new(r, 0.0, 0.0), a, b, w).abs() < TOL);
        // Equator ring at the half width
        assert!(vesica_segment(c + Vec3::new(0.0, w, 0.0), a, b, w).abs() < TOL);
        assert!(vesica_segment(c + Vec3::new(0.0, 0.0, -w), a, b, w).abs() < TOL);
    }

    #[test]
    fn vesica_tip_region_uses_point_distance() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 2.0, 0.0);
        let c = (a + b) * 0.3;
        // Straight past the tip: distance to the tip point
        let p = c + Vec3::new(0.0, 1.5, 0.0);
        assert!((vesica_segment(p, a, b, 0.2) - 0.5).abs() < TOL);
        // Centre is inside by the half width
        assert!((vesica_segment(c, a, b, 0.2) + 0.2).abs() < TOL);
    }

    #[test]
    fn cylinder_side_and_caps() {
        assert!(cylinder(Vec3::new(0.5, 0.3, 0.0), 1.0, 0.5).abs() < TOL);
        assert!(cylinder(Vec3::new(0.0, 1.0, 0.2), 1.0, 0.5).abs() < TOL);
        assert!((cylinder(Vec3::new(0.0, 3.0, 0.0), 1.0, 0.5) - 2.0).abs() < TOL);
        assert!((cylinder(Vec3::ZERO, 1.0, 0.5) + 0.5).abs() < TOL);
    }

    #[test]
    fn degenerate_parameters_have_no_surface() {
        let p = Vec3::new(0.1, 0.2, 0.3);
        assert_eq!(vesica_segment(p, Vec3::ONE, Vec3::ONE, 0.1), f32::INFINITY);
        assert_eq!(vesica_segment(p, Vec3::ZERO, Vec3::X, 0.0), f32::INFINITY);
        assert_eq!(vesica_segment(p, Vec3::ZERO, Vec3::X, -1.0), f32::INFINITY);
        assert_eq!(
            vesica_segment(p, Vec3::ZERO, Vec3::splat(f32::NAN), 0.1),
            f32::INFINITY
        );
        assert_eq!(sphere(p, -1.0), f32::INFINITY);
        assert_eq!(sphere(p, f32::NAN), f32::INFINITY);
        assert_eq!(box3(p, Vec3::new(1.0, -1.0, 1.0)), f32::INFINITY);
        assert_eq!(cylinder(p, f32::INFINITY, 1.0), f32::INFINITY);
        assert_eq!(box_frame(p, Vec3::ONE, -0.1), f32::INFINITY);
    }

    #[test]
    fn zero_radius_is_a_point() {
        let p = Vec3::new(3.0, 4.0, 0.0);
        assert!((sphere(p, 0.0) - 5.0).abs() < TOL);
        // Zero-radius cylinder is the Y segment [-1, 1]
        assert!((cylinder(Vec3::new(2.0, 0.0, 0.0), 1.0, 0.0) - 2.0).abs() < TOL);
    }
}
