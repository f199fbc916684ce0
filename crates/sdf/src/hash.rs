use serde::{Deserialize, Serialize};

/// GLSL-style fractional part: `x - floor(x)`.
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Multiplier of the `fract(sin(n) * K)` hash.
///
/// The key is part of the scene's look: changing it moves every
/// butterfly, so each layout pins its own key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashKey(pub f32);

impl HashKey {
    /// Key used by the grid layout.
    pub const GRID: HashKey = HashKey(753.5453123);
    /// Key used by the radial layout.
    pub const RADIAL: HashKey = HashKey(43758.5453);

    /// Pseudo-random value in `[0, 1]` derived from `n`. Pure.
    #[inline]
    pub fn rand(self, n: f32) -> f32 {
        fract(n.sin() * self.0)
    }
}

impl Default for HashKey {
    fn default() -> Self {
        Self::GRID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fract_matches_glsl() {
        assert_eq!(fract(2.25), 0.25);
        assert_eq!(fract(-0.25), 0.75);
        assert_eq!(fract(3.0), 0.0);
    }

    #[test]
    fn rand_is_reproducible() {
        for key in [HashKey::GRID, HashKey::RADIAL] {
            for i in 0..64 {
                let n = i as f32;
                assert_eq!(key.rand(n).to_bits(), key.rand(n).to_bits());
            }
        }
    }

    #[test]
    fn rand_stays_in_unit_range() {
        for i in -200..200 {
            let v = HashKey::RADIAL.rand(i as f32 * 0.37);
            assert!((0.0..=1.0).contains(&v), "rand out of range: {v}");
        }
    }

    #[test]
    fn keys_differ() {
        assert_ne!(HashKey::GRID.rand(1.0), HashKey::RADIAL.rand(1.0));
    }
}
