use papillon_common::Ray;
use papillon_sdf::DistanceField;
use serde::{Deserialize, Serialize};

/// Sphere tracing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchConfig {
    /// Iteration cap. Running out is a miss, never a hit.
    pub max_steps: u32,
    /// Rays that travel this far without a hit escape.
    pub max_distance: f32,
    /// A sample closer than this to the surface is a hit.
    pub hit_epsilon: f32,
    /// Offset used for central-difference normals.
    pub normal_epsilon: f32,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self::meadow()
    }
}

impl MarchConfig {
    /// Fine stepping for the butterfly grid: 256 steps, half-millimetre hits.
    pub fn meadow() -> Self {
        Self {
            max_steps: 256,
            max_distance: 100.0,
            hit_epsilon: 0.0005,
            normal_epsilon: 0.001,
        }
    }

    /// Cheaper stepping for the lamp post scene.
    pub fn lamppost() -> Self {
        Self {
            max_steps: 100,
            max_distance: 100.0,
            hit_epsilon: 0.001,
            normal_epsilon: 0.001,
        }
    }
}

/// Why a ray found no surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissReason {
    /// Travelled past `max_distance`.
    Escaped,
    /// Ran out of steps while still inside the range.
    StepBudget,
    /// The field returned NaN or an infinity.
    NonFinite,
}

/// Outcome of marching one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarchResult {
    Hit { distance: f32, steps: u32 },
    Miss { steps: u32, reason: MissReason },
}

impl MarchResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, MarchResult::Hit { .. })
    }

    /// Distance along the ray to the surface, if any.
    pub fn distance(&self) -> Option<f32> {
        match *self {
            MarchResult::Hit { distance, .. } => Some(distance),
            MarchResult::Miss { .. } => None,
        }
    }

    /// Field evaluations spent on this ray.
    pub fn steps(&self) -> u32 {
        match *self {
            MarchResult::Hit { steps, .. } | MarchResult::Miss { steps, .. } => steps,
        }
    }
}

/// Sphere-trace `ray` through `field` at `time`.
///
/// Each step advances by the sampled distance, which never overshoots an
/// exact field. Terminates after at most `config.max_steps` evaluations.
pub fn march<F>(field: &F, ray: &Ray, time: f32, config: &MarchConfig) -> MarchResult
where
    F: DistanceField + ?Sized,
{
    let mut t = 0.0_f32;
    for step in 1..=config.max_steps {
        let d = field.distance(ray.at(t), time);
        if !d.is_finite() {
            return MarchResult::Miss {
                steps: step,
                reason: MissReason::NonFinite,
            };
        }
        if d < config.hit_epsilon {
            return MarchResult::Hit { distance: t, steps: step };
        }
        t += d;
        if t >= config.max_distance {
            return MarchResult::Miss {
                steps: step,
                reason: MissReason::Escaped,
            };
        }
    }
    MarchResult::Miss {
        steps: config.max_steps,
        reason: MissReason::StepBudget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use papillon_sdf::primitives::sphere;

    fn unit_sphere(p: Vec3, _t: f32) -> f32 {
        sphere(p, 1.0)
    }

    #[test]
    fn hits_sphere_in_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let result = march(&unit_sphere, &ray, 0.0, &MarchConfig::meadow());
        let t = result.distance().unwrap();
        assert!((t - 2.0).abs() < 1e-3, "t = {t}");
        assert!(result.steps() <= 3);
    }

    #[test]
    fn escapes_when_pointing_away() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Z);
        let result = march(&unit_sphere, &ray, 0.0, &MarchConfig::lamppost());
        assert!(matches!(
            result,
            MarchResult::Miss {
                reason: MissReason::Escaped,
                ..
            }
        ));
    }

    #[test]
    fn step_budget_is_a_miss() {
        // Never converges: every step moves 0.1 forward
        let fog = |_: Vec3, _: f32| 0.1_f32;
        let config = MarchConfig {
            max_steps: 10,
            ..MarchConfig::meadow()
        };
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(
            march(&fog, &ray, 0.0, &config),
            MarchResult::Miss {
                steps: 10,
                reason: MissReason::StepBudget
            }
        );
    }

    #[test]
    fn non_finite_field_is_a_miss() {
        let broken = |_: Vec3, _: f32| f32::NAN;
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let result = march(&broken, &ray, 0.0, &MarchConfig::default());
        assert_eq!(
            result,
            MarchResult::Miss {
                steps: 1,
                reason: MissReason::NonFinite
            }
        );
    }

    #[test]
    fn starting_inside_hits_immediately() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let result = march(&unit_sphere, &ray, 0.0, &MarchConfig::default());
        assert_eq!(result, MarchResult::Hit { distance: 0.0, steps: 1 });
    }

    #[test]
    fn march_uses_time() {
        // Sphere centre moves along -Z with time
        let moving = |p: Vec3, t: f32| sphere(p + Vec3::new(0.0, 0.0, t), 1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let t0 = march(&moving, &ray, 0.0, &MarchConfig::default()).distance().unwrap();
        let t1 = march(&moving, &ray, 1.0, &MarchConfig::default()).distance().unwrap();
        assert!((t1 - t0 - 1.0).abs() < 1e-3);
    }
}
