//! Boolean composition of signed distances.

/// Nearest surface of either operand.
#[inline]
pub fn union(d1: f32, d2: f32) -> f32 {
    d1.min(d2)
}

/// Cut the solid of `d2` out of the solid of `d1`. Order matters.
#[inline]
pub fn subtraction(d1: f32, d2: f32) -> f32 {
    d1.max(-d2)
}

/// Region inside both operands.
#[inline]
pub fn intersection(d1: f32, d2: f32) -> f32 {
    d1.max(d2)
}

/// Polynomial smooth minimum with blend radius `k`.
///
/// Falls back to [`union`] when `k <= 0`.
#[inline]
pub fn smooth_union(d1: f32, d2: f32, k: f32) -> f32 {
    if k.is_nan() || k <= 0.0 {
        return union(d1, d2);
    }
    let h = (0.5 + 0.5 * (d2 - d1) / k).clamp(0.0, 1.0);
    d2 + (d1 - d2) * h - k * h * (1.0 - h)
}

/// Union of any number of distances. Empty input has no surface.
pub fn union_all(distances: impl IntoIterator<Item = f32>) -> f32 {
    distances.into_iter().fold(f32::INFINITY, union)
}
