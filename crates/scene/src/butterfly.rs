use glam::Vec3;
use papillon_sdf::{ops, primitives};
use serde::{Deserialize, Serialize};

/// Wing animation: flap (vertical tip offset) and curve (depth tip offset).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WingMotion {
    /// Angular rate of the flap oscillation.
    pub flap_rate: f32,
    pub flap_amplitude: f32,
    /// Angular rate of the curve oscillation.
    pub curve_rate: f32,
    pub curve_amplitude: f32,
    /// Wing clock = `time * clock_scale + index * index_phase`.
    /// A scale of 0 freezes the wings.
    pub clock_scale: f32,
    pub index_phase: f32,
}

impl Default for WingMotion {
    fn default() -> Self {
        Self {
            flap_rate: 2.5,
            flap_amplitude: 0.5,
            curve_rate: 1.7,
            curve_amplitude: 0.3,
            clock_scale: 1.0,
            index_phase: 0.0,
        }
    }
}

impl WingMotion {
    /// Faster, per-instance phased wings used by the radial layout.
    pub fn fluttering() -> Self {
        Self {
            flap_rate: 3.0,
            curve_rate: 2.0,
            clock_scale: 2.0,
            index_phase: 1.0,
            ..Self::default()
        }
    }

    pub fn wing_time(&self, time: f32, index: u32) -> f32 {
        time * self.clock_scale + index as f32 * self.index_phase
    }

    /// Wingtip offsets from the body centre, in the order
    /// top-left, top-right, bottom-left, bottom-right.
    pub fn wingtips(&self, size: f32, wing_time: f32) -> [Vec3; 4] {
        let flap = (wing_time * self.flap_rate).sin() * self.flap_amplitude;
        let curve = (wing_time * self.curve_rate).cos() * self.curve_amplitude;

        let top_y = size * 0.8 + flap;
        let bottom_y = -size * 0.6 - flap * 0.7;
        [
            Vec3::new(-size * 1.5, top_y, curve),
            Vec3::new(size * 1.5, top_y, curve),
            Vec3::new(-size * 1.2, bottom_y, -curve),
            Vec3::new(size * 1.2, bottom_y, -curve),
        ]
    }
}

/// Distance to four vesica wing panels sharing a centre at the local origin.
#[inline]
pub fn wings_distance(local: Vec3, tips: &[Vec3; 4], thickness: f32) -> f32 {
    let panel = |tip: Vec3| primitives::vesica_segment(local, Vec3::ZERO, tip, thickness);
    ops::union(
        ops::union(panel(tips[0]), panel(tips[1])),
        ops::union(panel(tips[2]), panel(tips[3])),
    )
}
