use std::path::Path;
use std::str::FromStr;

use papillon_common::Resolution;
use papillon_scene::{Scene, SceneConfig, SceneError};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::march::MarchConfig;
use crate::renderer::CpuRenderer;
use crate::shade::{Light, ShadingConfig};

/// Errors from loading or validating a render configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("unknown preset: {0} (expected meadow or lamppost)")]
    UnknownPreset(String),
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Built-in scene and rendering presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Grid of butterflies on a white sky.
    #[default]
    Meadow,
    /// Butterflies circling a lamp post at night.
    Lamppost,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Meadow, Preset::Lamppost];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Meadow => "meadow",
            Preset::Lamppost => "lamppost",
        }
    }

    pub fn config(&self) -> RenderConfig {
        match self {
            Preset::Meadow => RenderConfig::meadow(),
            Preset::Lamppost => RenderConfig::lamppost(),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

/// Everything needed to render a frame besides the time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub resolution: Resolution,
    pub scene: SceneConfig,
    pub camera: Camera,
    pub march: MarchConfig,
    pub shading: ShadingConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::meadow()
    }
}

impl RenderConfig {
    pub fn meadow() -> Self {
        Self {
            resolution: Resolution::default(),
            scene: SceneConfig::default(),
            camera: Camera::default(),
            march: MarchConfig::meadow(),
            shading: ShadingConfig::meadow(),
        }
    }

    pub fn lamppost() -> Self {
        Self {
            resolution: Resolution::default(),
            scene: SceneConfig::lamppost(),
            camera: Camera::default(),
            march: MarchConfig::lamppost(),
            shading: ShadingConfig::lamppost(),
        }
    }

    /// Load from a YAML or JSON file, chosen by extension, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let config: RenderConfig = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "json" => serde_json::from_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        config.validate()?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject configurations the renderer cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.march;
        if m.max_steps == 0 {
            return Err(ConfigError::Invalid("march.max_steps must be at least 1".into()));
        }
        for (name, value) in [
            ("march.max_distance", m.max_distance),
            ("march.hit_epsilon", m.hit_epsilon),
            ("march.normal_epsilon", m.normal_epsilon),
            ("camera.focal_length", self.camera.focal_length),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        if self.camera.origin.distance_squared(self.camera.target) == 0.0 {
            return Err(ConfigError::Invalid(
                "camera.target must differ from camera.origin".into(),
            ));
        }
        if self.shading.light == Light::Lamp && self.scene.variant.lamp().is_none() {
            return Err(ConfigError::Invalid(
                "shading.light is the lamp but the scene has no lamp post".into(),
            ));
        }
        Scene::new(self.scene)?;
        Ok(())
    }

    /// Shading with the scene's lamp post attached, so the lamp light and
    /// glow sit wherever the lamp geometry is.
    pub fn scene_shading(&self) -> ShadingConfig {
        self.shading.with_lamp(self.scene.variant.lamp())
    }

    /// Build the scene this config describes.
    pub fn scene(&self) -> Result<Scene, ConfigError> {
        Ok(Scene::new(self.scene)?)
    }

    pub fn renderer(&self) -> CpuRenderer {
        CpuRenderer::new(self.camera, self.march, self.scene_shading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for preset in Preset::ALL {
            preset.config().validate().unwrap();
        }
        assert_eq!(RenderConfig::default(), RenderConfig::meadow());
    }

    #[test]
    fn preset_parses_by_name() {
        assert_eq!("lamppost".parse::<Preset>().unwrap(), Preset::Lamppost);
        assert_eq!("Meadow".parse::<Preset>().unwrap(), Preset::Meadow);
        assert!(matches!(
            "swamp".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn yaml_round_trip() {
        let config = RenderConfig::lamppost();
        let yaml = config.to_yaml().unwrap();
        let back: RenderConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn load_yaml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("scene.yaml");
        std::fs::write(&yaml_path, "march:\n  max_steps: 64\n").unwrap();
        let yaml = RenderConfig::load(&yaml_path).unwrap();
        assert_eq!(yaml.march.max_steps, 64);
        assert_eq!(yaml.march.hit_epsilon, 0.0005);

        let json_path = dir.path().join("scene.json");
        let json = serde_json::to_string(&RenderConfig::lamppost()).unwrap();
        std::fs::write(&json_path, json).unwrap();
        assert_eq!(RenderConfig::load(&json_path).unwrap(), RenderConfig::lamppost());
    }

    #[test]
    fn load_rejects_overflowing_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.yaml");
        std::fs::write(
            &path,
            "scene:\n  variant:\n    kind: grid\n    layout:\n      count_x: 70000\n      count_y: 70000\n",
        )
        .unwrap();
        assert!(matches!(
            RenderConfig::load(&path),
            Err(ConfigError::Scene(SceneError::TooManyInstances { .. }))
        ));
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            RenderConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = RenderConfig::meadow();
        config.march.max_steps = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RenderConfig::meadow();
        config.march.hit_epsilon = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RenderConfig::meadow();
        config.camera.target = config.camera.origin;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RenderConfig::meadow();
        config.scene.color_epsilon = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Scene(_))));

        let mut config = RenderConfig::meadow();
        config.shading.light = Light::Lamp;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn moving_the_lamp_moves_its_light() {
        let yaml = "scene:\n  variant:\n    kind: radial\n    lamp:\n      lamp_center: [2.0, 1.0, 0.0]\nshading:\n  light:\n    kind: lamp\n  glow: {}\n";
        let config: RenderConfig = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();

        let shading = config.renderer().shading;
        let lamp = shading.lamp().unwrap();
        assert_eq!(lamp.lamp_center, glam::Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(
            shading.light.direction_from(glam::Vec3::new(2.0, -3.0, 0.0), Some(lamp)),
            glam::Vec3::Y
        );
    }
}
