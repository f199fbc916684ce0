use glam::Vec3;
use papillon_sdf::{DistanceField, SceneField, ops, rotate_y};
use serde::{Deserialize, Serialize};

use crate::butterfly::wings_distance;
use crate::layout::{GridLayout, Placement, RadialLayout};
use crate::scenery::{GroundMode, GroundPlane, Lamppost};

/// Which layout places the butterflies and what static scenery surrounds them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneVariant {
    /// Lattice of butterflies above a ground plane.
    Grid {
        #[serde(default)]
        layout: GridLayout,
        #[serde(default)]
        ground: GroundPlane,
    },
    /// Butterflies orbiting a lamp post.
    Radial {
        #[serde(default)]
        layout: RadialLayout,
        #[serde(default)]
        lamp: Lamppost,
    },
}

impl SceneVariant {
    pub fn name(&self) -> &'static str {
        match self {
            SceneVariant::Grid { .. } => "grid",
            SceneVariant::Radial { .. } => "radial",
        }
    }

    /// The lamp post, for variants that have one.
    pub fn lamp(&self) -> Option<&Lamppost> {
        match self {
            SceneVariant::Grid { .. } => None,
            SceneVariant::Radial { lamp, .. } => Some(lamp),
        }
    }
}

/// Scene configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub variant: SceneVariant,
    /// A point closer than this to an object takes that object's colour.
    pub color_epsilon: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            variant: SceneVariant::Grid {
                layout: GridLayout::default(),
                ground: GroundPlane::default(),
            },
            color_epsilon: 0.01,
        }
    }
}

impl SceneConfig {
    /// Butterflies orbiting a lamp post.
    pub fn lamppost() -> Self {
        Self {
            variant: SceneVariant::Radial {
                layout: RadialLayout::default(),
                lamp: Lamppost::default(),
            },
            ..Self::default()
        }
    }
}

/// Errors from scene validation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    #[error("layout has no instances")]
    EmptyLayout,
    #[error("layout has too many instances (at most {max} allowed)")]
    TooManyInstances { max: u32 },
    #[error("invalid {name}: {value} (must be finite and positive)")]
    InvalidParameter { name: &'static str, value: f32 },
    #[error("ground normal must be unit length, got length {0}")]
    NonUnitNormal(f32),
}

/// One instance evaluated at one point: where the point sits in the
/// instance's frame, how far it is from the wings, and the wing colour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceSample {
    pub index: u32,
    pub local: Vec3,
    pub distance: f32,
    pub color: Vec3,
}

/// The full animated scene as a distance field over `(point, time)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    config: SceneConfig,
}

/// Upper bound on butterflies per scene. Every pixel visits every instance.
pub const MAX_INSTANCES: u32 = 4096;

fn instance_budget(count: Option<u32>) -> Result<(), SceneError> {
    match count {
        Some(0) => Err(SceneError::EmptyLayout),
        Some(n) if n <= MAX_INSTANCES => Ok(()),
        _ => Err(SceneError::TooManyInstances { max: MAX_INSTANCES }),
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), SceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidParameter { name, value })
    }
}

impl Scene {
    /// Build a scene, rejecting layouts the field cannot evaluate.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        positive("color_epsilon", config.color_epsilon)?;
        match &config.variant {
            SceneVariant::Grid { layout, ground } => {
                instance_budget(layout.checked_instance_count())?;
                positive("size", layout.size)?;
                positive("thickness", layout.thickness)?;
                let len = ground.normal.length();
                if len.is_nan() || (len - 1.0).abs() > 1e-3 {
                    return Err(SceneError::NonUnitNormal(len));
                }
            }
            SceneVariant::Radial { layout, lamp } => {
                instance_budget(Some(layout.count))?;
                positive("size", layout.size)?;
                positive("thickness", layout.thickness)?;
                positive("pole_radius", lamp.pole_radius)?;
                positive("lamp_radius", lamp.lamp_radius)?;
            }
        }
        tracing::debug!(
            variant = config.variant.name(),
            instances = Self::count_of(&config.variant),
            "scene built"
        );
        Ok(Self { config })
    }

    /// Grid of butterflies above a carved ground plane.
    pub fn meadow() -> Self {
        Self {
            config: SceneConfig::default(),
        }
    }

    /// Butterflies circling a lamp post.
    pub fn lamppost() -> Self {
        Self {
            config: SceneConfig::lamppost(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn variant(&self) -> &SceneVariant {
        &self.config.variant
    }

    fn count_of(variant: &SceneVariant) -> u32 {
        match variant {
            SceneVariant::Grid { layout, .. } => layout.instance_count(),
            SceneVariant::Radial { layout, .. } => layout.instance_count(),
        }
    }

    pub fn instance_count(&self) -> u32 {
        Self::count_of(&self.config.variant)
    }

    /// Placement of instance `index` at `time`. Pure.
    pub fn placement(&self, index: u32, time: f32) -> Placement {
        match &self.config.variant {
            SceneVariant::Grid { layout, .. } => layout.place(index, time),
            SceneVariant::Radial { layout, .. } => layout.place(index, time),
        }
    }

    /// Every instance's placement at `time`, in index order.
    pub fn placements(&self, time: f32) -> Vec<Placement> {
        (0..self.instance_count())
            .map(|i| self.placement(i, time))
            .collect()
    }

    /// Evaluate one instance at `p`. Both the distance field and the colour
    /// lookup go through here.
    pub fn sample_instance(&self, index: u32, p: Vec3, time: f32) -> InstanceSample {
        let placement = self.placement(index, time);
        let local = rotate_y(p - placement.position, placement.yaw);
        InstanceSample {
            index,
            local,
            distance: wings_distance(local, &placement.wingtips, placement.thickness),
            color: placement.color,
        }
    }

    /// Distance to the nearest butterfly, ignoring scenery.
    pub fn butterflies_distance(&self, p: Vec3, time: f32) -> f32 {
        ops::union_all((0..self.instance_count()).map(|i| self.sample_instance(i, p, time).distance))
    }

    /// First instance whose wings are within `color_epsilon` of `p`.
    pub fn instance_at(&self, p: Vec3, time: f32) -> Option<InstanceSample> {
        (0..self.instance_count())
            .map(|i| self.sample_instance(i, p, time))
            .find(|s| s.distance < self.config.color_epsilon)
    }
}

impl DistanceField for Scene {
    fn distance(&self, p: Vec3, time: f32) -> f32 {
        let butterflies = self.butterflies_distance(p, time);
        match &self.config.variant {
            SceneVariant::Grid { ground, .. } => ground.compose(butterflies, p),
            SceneVariant::Radial { lamp, .. } => ops::union(lamp.distance(p), butterflies),
        }
    }
}

impl SceneField for Scene {
    fn object_color(&self, p: Vec3, time: f32) -> Option<Vec3> {
        let eps = self.config.color_epsilon;
        match &self.config.variant {
            SceneVariant::Grid { ground, .. } => self
                .instance_at(p, time)
                .map(|s| s.color)
                .or_else(|| {
                    (ground.mode == GroundMode::Solid && ground.distance(p) < eps)
                        .then_some(ground.color)
                }),
            SceneVariant::Radial { lamp, .. } => lamp
                .color(p, eps)
                .or_else(|| self.instance_at(p, time).map(|s| s.color)),
        }
    }

    fn fallback_color(&self) -> Vec3 {
        match &self.config.variant {
            SceneVariant::Grid { .. } => Vec3::ONE,
            SceneVariant::Radial { .. } => Vec3::new(0.2, 0.2, 0.25),
        }
    }
}
