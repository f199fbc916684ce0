use glam::Vec3;
use papillon_sdf::{ops, primitives};
use serde::{Deserialize, Serialize};

/// How the ground plane combines with the butterflies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundMode {
    /// `subtraction(butterflies, plane)`: the half-space below the plane is
    /// cut out of the butterflies and the ground itself is not drawn.
    #[default]
    Carve,
    /// `union(butterflies, plane)`: the ground is drawn as a solid floor.
    Solid,
}

/// Infinite ground plane `dot(p, normal) + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundPlane {
    /// Unit normal.
    pub normal: Vec3,
    pub offset: f32,
    pub mode: GroundMode,
    /// Colour of the floor in `Solid` mode.
    pub color: Vec3,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self {
            normal: Vec3::Y,
            offset: 1.0,
            mode: GroundMode::Carve,
            color: Vec3::new(0.2, 0.2, 0.25),
        }
    }
}

impl GroundPlane {
    pub fn distance(&self, p: Vec3) -> f32 {
        primitives::plane(p, self.normal, self.offset)
    }

    /// Combine the plane with the distance to everything else.
    pub fn compose(&self, others: f32, p: Vec3) -> f32 {
        let plane = self.distance(p);
        match self.mode {
            GroundMode::Carve => ops::subtraction(others, plane),
            GroundMode::Solid => ops::union(others, plane),
        }
    }
}

/// Lamp post: a thin pole capped by a glowing sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lamppost {
    pub pole_center: Vec3,
    pub pole_half_height: f32,
    pub pole_radius: f32,
    pub pole_color: Vec3,
    pub lamp_center: Vec3,
    pub lamp_radius: f32,
    pub lamp_color: Vec3,
    /// Surface glow `strength / (0.01 + d^2)`, scaled by `glow_gain`.
    pub glow_strength: f32,
    pub glow_gain: f32,
}

impl Default for Lamppost {
    fn default() -> Self {
        Self {
            pole_center: Vec3::new(0.0, -1.0, 0.0),
            pole_half_height: 1.5,
            pole_radius: 0.1,
            pole_color: Vec3::splat(0.3),
            lamp_center: Vec3::new(0.0, 0.5, 0.0),
            lamp_radius: 0.3,
            lamp_color: Vec3::new(1.0, 0.9, 0.7),
            glow_strength: 0.05,
            glow_gain: 3.0,
        }
    }
}

impl Lamppost {
    pub fn pole_distance(&self, p: Vec3) -> f32 {
        primitives::cylinder(p - self.pole_center, self.pole_half_height, self.pole_radius)
    }

    pub fn lamp_distance(&self, p: Vec3) -> f32 {
        primitives::sphere(p - self.lamp_center, self.lamp_radius)
    }

    pub fn distance(&self, p: Vec3) -> f32 {
        ops::union(self.pole_distance(p), self.lamp_distance(p))
    }

    /// Colour of the post at `p`, checking the pole before the lamp.
    pub fn color(&self, p: Vec3, epsilon: f32) -> Option<Vec3> {
        if self.pole_distance(p) < epsilon {
            return Some(self.pole_color);
        }
        let lamp = self.lamp_distance(p);
        if lamp < epsilon {
            let glow = self.glow_strength / (0.01 + lamp * lamp);
            return Some(self.lamp_color * (1.0 + glow * self.glow_gain));
        }
        None
    }
}
