use std::time::{Duration, Instant};

use glam::{Vec2, Vec3};
use papillon_common::FrameParams;
use papillon_sdf::SceneField;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::frame::{Frame, luminance};
use crate::march::{MarchConfig, MarchResult, march};
use crate::normal::estimate_normal;
use crate::shade::ShadingConfig;
use crate::stats::FrameStats;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and the frame parameters, then produces
/// output. Scenes are pure fields, so rendering never mutates them.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of `scene`.
    fn render(&self, scene: &dyn SceneField, frame: &FrameParams) -> Self::Output;
}

/// One traced pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    pub color: Vec3,
    pub result: MarchResult,
}

/// A rendered frame with the ray statistics gathered while producing it.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub frame: Frame,
    pub stats: FrameStats,
    pub elapsed: Duration,
}

/// Brute-force CPU raymarcher. Rows are traced in parallel with rayon.
#[derive(Debug, Clone, Default)]
pub struct CpuRenderer {
    pub camera: Camera,
    pub march: MarchConfig,
    pub shading: ShadingConfig,
}

impl CpuRenderer {
    pub fn new(camera: Camera, march: MarchConfig, shading: ShadingConfig) -> Self {
        Self {
            camera,
            march,
            shading,
        }
    }

    /// Trace the primary ray through screen coordinate `uv`.
    pub fn trace(&self, scene: &dyn SceneField, uv: Vec2, time: f32) -> PixelSample {
        self.trace_ray(scene, self.camera.ray(uv), uv, time)
    }

    fn trace_ray(
        &self,
        scene: &dyn SceneField,
        ray: papillon_common::Ray,
        uv: Vec2,
        time: f32,
    ) -> PixelSample {
        let result = march(scene, &ray, time, &self.march);
        let color = match result {
            MarchResult::Hit { distance, .. } => {
                let p = ray.at(distance);
                let normal = estimate_normal(scene, p, time, self.march.normal_epsilon);
                let object = scene
                    .object_color(p, time)
                    .unwrap_or_else(|| scene.fallback_color());
                self.shading.shade(object, p, normal)
            }
            MarchResult::Miss { .. } => self.shading.background(uv),
        };
        PixelSample { color, result }
    }
}

impl Renderer for CpuRenderer {
    type Output = RenderedFrame;

    fn render(&self, scene: &dyn SceneField, params: &FrameParams) -> RenderedFrame {
        let res = params.resolution;
        let _span = tracing::info_span!(
            "render_frame",
            width = res.width,
            height = res.height,
            time = params.time
        )
        .entered();
        let start = Instant::now();

        let mut frame = Frame::filled(res, Vec3::ZERO);
        if res.is_empty() {
            return RenderedFrame {
                frame,
                stats: FrameStats::default(),
                elapsed: start.elapsed(),
            };
        }

        let (forward, right, up) = self.camera.basis();
        let stats = frame
            .pixels_mut()
            .par_chunks_mut(res.width as usize)
            .enumerate()
            .map(|(row, pixels)| {
                let mut stats = FrameStats::default();
                for (column, pixel) in pixels.iter_mut().enumerate() {
                    let uv = params.pixel_uv(column as u32, row as u32);
                    let ray = self.camera.ray_in_basis(uv, forward, right, up);
                    let sample = self.trace_ray(scene, ray, uv, params.time);
                    stats.record(&sample.result);
                    *pixel = sample.color;
                }
                stats
            })
            .reduce(FrameStats::default, FrameStats::merge);

        let elapsed = start.elapsed();
        tracing::debug!(%stats, ?elapsed, "frame rendered");
        RenderedFrame {
            frame,
            stats,
            elapsed,
        }
    }
}

/// ASCII preview renderer.
///
/// Traces the frame on the CPU and maps each pixel's luminance onto a
/// character ramp, dark to bright. Useful for CLI output, logging, and
/// testing the render interface without writing images.
#[derive(Debug, Clone, Default)]
pub struct DebugTextRenderer {
    pub inner: CpuRenderer,
}

const RAMP: &[u8] = b" .:-=+*#%@";

impl DebugTextRenderer {
    pub fn new(inner: CpuRenderer) -> Self {
        Self { inner }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &dyn SceneField, params: &FrameParams) -> String {
        let rendered = self.inner.render(scene, params);
        let res = params.resolution;
        let mut out = format!(
            "=== Frame (time={:.2}, {}x{}, hits={}) ===\n",
            params.time, res.width, res.height, rendered.stats.hits
        );
        for row in rendered.frame.rows() {
            out.extend(row.iter().map(|&c| {
                let l = luminance(c).clamp(0.0, 1.0);
                RAMP[(l * (RAMP.len() - 1) as f32).round() as usize] as char
            }));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papillon_common::Resolution;
    use papillon_scene::Scene;
    use papillon_sdf::{DistanceField, primitives};

    /// Red unit sphere at the origin.
    struct RedBall;

    impl DistanceField for RedBall {
        fn distance(&self, p: Vec3, _time: f32) -> f32 {
            primitives::sphere(p, 1.0)
        }
    }

    impl SceneField for RedBall {
        fn object_color(&self, p: Vec3, _time: f32) -> Option<Vec3> {
            (primitives::sphere(p, 1.0) < 0.01).then_some(Vec3::X)
        }
    }

    #[test]
    fn centre_pixel_hits_and_corner_misses() {
        let renderer = CpuRenderer::default();
        let params = FrameParams::new(Resolution::new(9, 9), 0.0);
        let out = renderer.render(&RedBall, &params);

        let centre = out.frame.get(4, 4).unwrap();
        assert!(centre.x > 0.5 && centre.y == 0.0, "centre {centre}");
        assert_eq!(out.frame.get(0, 0), Some(Vec3::ONE));
        assert_eq!(out.stats.rays(), 81);
        assert!(out.stats.hits > 0 && out.stats.escaped > 0);
    }

    #[test]
    fn trace_reports_hit_distance() {
        let renderer = CpuRenderer::default();
        let sample = renderer.trace(&RedBall, Vec2::ZERO, 0.0);
        let t = sample.result.distance().unwrap();
        assert!((t - 2.0).abs() < 1e-3);
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = CpuRenderer::new(
            Camera::default(),
            MarchConfig::lamppost(),
            ShadingConfig::lamppost(),
        );
        let scene = Scene::lamppost();
        let params = FrameParams::new(Resolution::new(24, 16), 1.25);
        let a = renderer.render(&scene, &params);
        let b = renderer.render(&scene, &params);
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.stats, b.stats);
        assert!(a.stats.hits > 0, "the lamp post should be visible");
    }

    #[test]
    fn empty_resolution_renders_nothing() {
        let renderer = CpuRenderer::default();
        let out = renderer.render(&RedBall, &FrameParams::new(Resolution::new(0, 10), 0.0));
        assert!(out.frame.pixels().is_empty());
        assert_eq!(out.stats.rays(), 0);
    }

    #[test]
    fn ascii_preview_has_one_line_per_row() {
        let renderer = DebugTextRenderer::default();
        let params = FrameParams::new(Resolution::new(12, 6), 0.0);
        let text = renderer.render(&RedBall, &params);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("12x6"));
        assert_eq!(lines.len(), 7);
        assert!(lines[1..].iter().all(|l| l.chars().count() == 12));
        // White background maps to the brightest character
        assert!(lines[1].starts_with('@'));
    }
}
