use glam::Vec3;
use papillon_sdf::HashKey;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::butterfly::WingMotion;

/// Where one butterfly is and how it looks at a given time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: u32,
    /// Body centre in scene space.
    pub position: Vec3,
    /// Rotation about Y applied to scene-space offsets to reach local space.
    pub yaw: f32,
    pub size: f32,
    pub thickness: f32,
    /// Wingtip offsets in local space (see [`WingMotion::wingtips`]).
    pub wingtips: [Vec3; 4],
    pub color: Vec3,
}

/// Butterflies on a regular X/Y/Z lattice, bobbing and spinning in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub count_x: u32,
    pub count_y: u32,
    pub count_z: u32,
    /// X span covered by the columns.
    pub x_range: [f32; 2],
    /// Z of the front layer; later layers step back by `z_step`.
    pub z_start: f32,
    pub z_step: f32,
    /// Height of the top row. Rows are spread by `pow(t, height_exponent)`.
    pub height: f32,
    pub height_exponent: f32,
    pub bob_amplitude: f32,
    pub bob_rate: f32,
    pub bob_jitter: f32,
    pub spin_rate: f32,
    pub spin_jitter: f32,
    pub size: f32,
    pub thickness: f32,
    pub base_color: Vec3,
    /// Colour offset scaled by a per-instance hash in [0, 1].
    pub color_shift: Vec3,
    pub wings: WingMotion,
    pub hash: HashKey,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            count_x: 5,
            count_y: 2,
            count_z: 2,
            x_range: [-5.0, 5.0],
            z_start: -5.0,
            z_step: 2.5,
            height: 4.0,
            height_exponent: 0.5,
            bob_amplitude: 0.8,
            bob_rate: 0.5,
            bob_jitter: 0.3,
            spin_rate: 0.3,
            spin_jitter: 0.5,
            size: 0.4,
            thickness: 0.08,
            base_color: Vec3::new(0.2, 0.4, 0.9),
            color_shift: Vec3::new(-0.2, 0.0, 0.2),
            wings: WingMotion::default(),
            hash: HashKey::GRID,
        }
    }
}

/// Fraction `i / (count - 1)`, or `fallback` when the axis has one cell.
#[inline]
fn lattice_fraction(i: u32, count: u32, fallback: f32) -> f32 {
    if count > 1 {
        i as f32 / (count - 1) as f32
    } else {
        fallback
    }
}

impl GridLayout {
    /// Lattice size, or `None` when the product overflows `u32`.
    pub fn checked_instance_count(&self) -> Option<u32> {
        self.count_x
            .checked_mul(self.count_y)?
            .checked_mul(self.count_z)
    }

    /// Lattice size, saturating at `u32::MAX`. Scenes reject layouts
    /// whose product overflows, so this is exact for any built scene.
    pub fn instance_count(&self) -> u32 {
        self.checked_instance_count().unwrap_or(u32::MAX)
    }

    /// Lattice coordinates `(xi, yi, zi)` of a flat index.
    ///
    /// Inverse of `i = zi * (count_x * count_y) + xi * count_y + yi`.
    pub fn cell(&self, index: u32) -> (u32, u32, u32) {
        let layer = self.count_x.saturating_mul(self.count_y).max(1);
        let zi = index / layer;
        let rest = index % layer;
        let rows = self.count_y.max(1);
        (rest / rows, rest % rows, zi)
    }

    pub fn place(&self, index: u32, time: f32) -> Placement {
        let (xi, yi, zi) = self.cell(index);
        let n = index as f32;
        let rand = |v: f32| self.hash.rand(v);

        let tx = lattice_fraction(xi, self.count_x, 0.5);
        let x = self.x_range[0] + (self.x_range[1] - self.x_range[0]) * tx;
        let z = self.z_start - zi as f32 * self.z_step;

        let ty = lattice_fraction(yi, self.count_y, 0.0);
        let y_base = ty.powf(self.height_exponent) * self.height;
        let bob = (time * (self.bob_rate + rand(n) * self.bob_jitter)).sin() * self.bob_amplitude;

        let yaw = time * (self.spin_rate + rand(n + 1.0) * self.spin_jitter);
        let wing_time = self.wings.wing_time(time, index);

        Placement {
            index,
            position: Vec3::new(x, y_base + bob, z),
            yaw,
            size: self.size,
            thickness: self.thickness,
            wingtips: self.wings.wingtips(self.size, wing_time),
            color: self.base_color + rand(n + 3.0) * self.color_shift,
        }
    }
}

/// Butterflies orbiting a vertical axis at jittered radii and heights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialLayout {
    pub count: u32,
    pub orbit_rate: f32,
    pub orbit_jitter: f32,
    pub radius: f32,
    pub radius_jitter: f32,
    pub height: f32,
    pub bob_amplitude: f32,
    pub bob_rate: f32,
    pub bob_jitter: f32,
    pub size: f32,
    pub size_jitter: f32,
    pub thickness: f32,
    /// Wing colours blended by a per-instance hash.
    pub palette: [Vec3; 2],
    pub wings: WingMotion,
    pub hash: HashKey,
}

impl Default for RadialLayout {
    fn default() -> Self {
        Self {
            count: 15,
            orbit_rate: 0.3,
            orbit_jitter: 0.2,
            radius: 1.5,
            radius_jitter: 0.8,
            height: 0.5,
            bob_amplitude: 0.8,
            bob_rate: 0.5,
            bob_jitter: 0.3,
            size: 0.1,
            size_jitter: 0.05,
            thickness: 0.03,
            palette: [Vec3::new(0.2, 0.4, 0.9), Vec3::new(0.9, 0.4, 0.2)],
            wings: WingMotion::fluttering(),
            hash: HashKey::RADIAL,
        }
    }
}

impl RadialLayout {
    pub fn instance_count(&self) -> u32 {
        self.count
    }

    pub fn place(&self, index: u32, time: f32) -> Placement {
        let n = index as f32;
        let rand = |v: f32| self.hash.rand(v);

        let angle = n * TAU / self.count.max(1) as f32
            + time * (self.orbit_rate + rand(n) * self.orbit_jitter);
        let radius = self.radius + rand(n * 10.0) * self.radius_jitter;
        let height = self.height
            + (time * (self.bob_rate + rand(n * 2.0) * self.bob_jitter)).sin() * self.bob_amplitude;

        let size = self.size + rand(n * 5.0) * self.size_jitter;
        let wing_time = self.wings.wing_time(time, index);
        let hue = rand(n * 3.0);

        Placement {
            index,
            position: Vec3::new(angle.cos() * radius, height, angle.sin() * radius),
            // Bodies face along their orbit
            yaw: angle,
            size,
            thickness: self.thickness,
            wingtips: self.wings.wingtips(size, wing_time),
            color: self.palette[0].lerp(self.palette[1], hue),
        }
    }
}
