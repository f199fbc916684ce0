use glam::{Vec2, Vec3};
use papillon_scene::Lamppost;
use serde::{Deserialize, Serialize};

/// Light source for Lambert shading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    /// Parallel light arriving from `direction` (pointing toward the light).
    Directional { direction: Vec3 },
    /// Light emitted from a point.
    Point { position: Vec3 },
    /// Light emitted from the centre of the scene's lamp post.
    Lamp,
}

impl Light {
    /// Unit vector from `p` toward the light. A `Lamp` light without a
    /// lamp post contributes no direction.
    pub fn direction_from(&self, p: Vec3, lamp: Option<&Lamppost>) -> Vec3 {
        match *self {
            Light::Directional { direction } => direction.normalize_or_zero(),
            Light::Point { position } => (position - p).normalize_or_zero(),
            Light::Lamp => lamp.map_or(Vec3::ZERO, |l| (l.lamp_center - p).normalize_or_zero()),
        }
    }
}

/// What a ray that hits nothing sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    Flat { color: Vec3 },
    /// `mix(bottom, top, uv.y + 0.5)` over the screen.
    VerticalGradient { bottom: Vec3, top: Vec3 },
}

impl Background {
    pub fn color(&self, uv: Vec2) -> Vec3 {
        match *self {
            Background::Flat { color } => color,
            Background::VerticalGradient { bottom, top } => bottom.lerp(top, uv.y + 0.5),
        }
    }
}

/// Additive halo around the scene's lamp, applied to lit surfaces close to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampGlow {
    pub color: Vec3,
    /// Glow is `strength / (0.01 + d^2)` at lamp distance `d`.
    pub strength: f32,
    pub weight: f32,
    /// Surfaces farther than this from the lamp get no glow.
    pub reach: f32,
}

impl Default for LampGlow {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 0.9, 0.7),
            strength: 0.1,
            weight: 0.5,
            reach: 0.3,
        }
    }
}

impl LampGlow {
    /// Glow on a surface at `lamp_distance` from the lamp sphere.
    pub fn contribution(&self, lamp_distance: f32) -> Vec3 {
        let d = lamp_distance;
        if d < self.reach {
            self.color * (self.strength / (0.01 + d * d)) * self.weight
        } else {
            Vec3::ZERO
        }
    }
}

/// Lambert lighting plus background and optional lamp glow.
///
/// `Light::Lamp` and the glow follow the lamp post attached with
/// [`ShadingConfig::with_lamp`]. Without one both are dark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    pub light: Light,
    pub ambient: f32,
    pub diffuse: f32,
    pub background: Background,
    pub glow: Option<LampGlow>,
    #[serde(skip)]
    lamp: Option<Lamppost>,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self::meadow()
    }
}

impl ShadingConfig {
    /// Sun from the upper right on a white sky.
    pub fn meadow() -> Self {
        Self {
            light: Light::Directional {
                direction: Vec3::new(10.0, 10.0, 10.0).normalize(),
            },
            ambient: 0.0,
            diffuse: 1.0,
            background: Background::Flat { color: Vec3::ONE },
            glow: None,
            lamp: None,
        }
    }

    /// Night scene lit by the lamp.
    pub fn lamppost() -> Self {
        Self {
            light: Light::Lamp,
            ambient: 0.5,
            diffuse: 0.5,
            background: Background::VerticalGradient {
                bottom: Vec3::new(0.1, 0.1, 0.15),
                top: Vec3::new(0.05, 0.05, 0.1),
            },
            glow: Some(LampGlow::default()),
            lamp: None,
        }
    }

    /// Attach the scene's lamp post, if any.
    pub fn with_lamp(mut self, lamp: Option<&Lamppost>) -> Self {
        self.lamp = lamp.copied();
        self
    }

    pub fn lamp(&self) -> Option<&Lamppost> {
        self.lamp.as_ref()
    }

    /// Colour of a lit surface point, clamped to [0, 1].
    pub fn shade(&self, object_color: Vec3, p: Vec3, normal: Vec3) -> Vec3 {
        let lambert = normal
            .dot(self.light.direction_from(p, self.lamp.as_ref()))
            .max(0.0);
        let mut color = object_color;
        if let (Some(glow), Some(lamp)) = (&self.glow, &self.lamp) {
            color += glow.contribution(lamp.lamp_distance(p));
        }
        (color * (self.ambient + self.diffuse * lambert)).clamp(Vec3::ZERO, Vec3::ONE)
    }

    pub fn background(&self, uv: Vec2) -> Vec3 {
        self.background.color(uv).clamp(Vec3::ZERO, Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lambert_faces_light() {
        let shading = ShadingConfig {
            light: Light::Directional { direction: Vec3::Y },
            ..ShadingConfig::meadow()
        };
        let lit = shading.shade(Vec3::splat(0.5), Vec3::ZERO, Vec3::Y);
        assert!((lit - Vec3::splat(0.5)).length() < 1e-6);
        // Facing away: black with no ambient
        assert_eq!(shading.shade(Vec3::ONE, Vec3::ZERO, Vec3::NEG_Y), Vec3::ZERO);
    }

    #[test]
    fn ambient_floor_and_clamp() {
        let shading = ShadingConfig {
            glow: None,
            ..ShadingConfig::lamppost()
        }
        .with_lamp(Some(&Lamppost::default()));
        // Light at (0, 0.5, 0); a point below facing down is unlit
        let c = shading.shade(Vec3::ONE, Vec3::new(0.0, -2.0, 0.0), Vec3::NEG_Y);
        assert!((c - Vec3::splat(0.5)).length() < 1e-6);
        let bright = shading.shade(Vec3::splat(4.0), Vec3::new(0.0, -2.0, 0.0), Vec3::Y);
        assert_eq!(bright, Vec3::ONE);
    }

    #[test]
    fn glow_only_near_the_lamp() {
        let glow = LampGlow::default();
        assert!(glow.contribution(0.1).x > 0.0);
        assert_eq!(glow.contribution(2.5), Vec3::ZERO);
        // On the lamp surface: 0.1 / 0.01 * 0.5 = 5
        assert!((glow.contribution(0.0).x - 5.0).abs() < 1e-3);
    }

    #[test]
    fn lamp_light_and_glow_follow_the_lamp() {
        let moved = Lamppost {
            lamp_center: Vec3::new(4.0, 2.0, 0.0),
            ..Lamppost::default()
        };
        let shading = ShadingConfig::lamppost().with_lamp(Some(&moved));
        assert_eq!(shading.light.direction_from(Vec3::new(4.0, 0.0, 0.0), shading.lamp()), Vec3::Y);

        let base = Vec3::splat(0.1);
        let near_new = shading.shade(base, Vec3::new(4.0, 2.4, 0.0), Vec3::Y);
        let near_old = shading.shade(base, Vec3::new(0.0, 0.9, 0.0), Vec3::Y);
        assert!(near_new.x > 0.9, "glow at the moved lamp: {near_new}");
        assert!(near_old.x < 0.2, "no glow left at the old lamp: {near_old}");
    }

    #[test]
    fn lamp_light_without_lamp_is_ambient_only() {
        let shading = ShadingConfig::lamppost();
        assert!(shading.lamp().is_none());
        let c = shading.shade(Vec3::ONE, Vec3::new(0.0, 0.9, 0.0), Vec3::NEG_Y);
        assert!((c - Vec3::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn gradient_background_spans_screen() {
        let shading = ShadingConfig::lamppost();
        let bottom = shading.background(Vec2::new(0.0, -0.5));
        let top = shading.background(Vec2::new(0.0, 0.5));
        assert!((bottom - Vec3::new(0.1, 0.1, 0.15)).length() < 1e-6);
        assert!((top - Vec3::new(0.05, 0.05, 0.1)).length() < 1e-6);
        assert_eq!(ShadingConfig::meadow().background(Vec2::ZERO), Vec3::ONE);
    }

    #[test]
    fn light_serializes_tagged() {
        let json = serde_json::to_string(&Light::Point { position: Vec3::ZERO }).unwrap();
        assert!(json.contains("\"kind\":\"point\""));
    }
}
