use glam::Vec3;

/// A signed distance field over space and time.
///
/// Implementations must be pure functions of `(p, time)`; the renderer
/// evaluates them from many threads at once.
pub trait DistanceField: Sync {
    fn distance(&self, p: Vec3, time: f32) -> f32;
}

impl<F> DistanceField for F
where
    F: Fn(Vec3, f32) -> f32 + Sync,
{
    #[inline]
    fn distance(&self, p: Vec3, time: f32) -> f32 {
        self(p, time)
    }
}

/// A distance field that can also tell which object a surface point belongs to.
pub trait SceneField: DistanceField {
    /// Colour of the object at `p`, or `None` when `p` is not on any object.
    fn object_color(&self, p: Vec3, time: f32) -> Option<Vec3>;

    /// Colour used when a hit point matches no object.
    fn fallback_color(&self) -> Vec3 {
        Vec3::ONE
    }
}
