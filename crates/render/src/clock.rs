use std::time::Duration;

use papillon_common::{FrameParams, Resolution};

/// Animation clock owned by the application loop.
///
/// Time never runs backwards: pausing stops it, scaling changes its rate,
/// and negative scales are clamped to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    time: f32,
    scale: f32,
    paused: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            scale: 1.0,
            paused: false,
        }
    }

    /// A clock that starts at `time` seconds.
    pub fn starting_at(time: f32) -> Self {
        Self {
            time: time.max(0.0),
            ..Self::new()
        }
    }

    /// Advance by a wall-clock interval and return the new animation time.
    pub fn advance(&mut self, dt: Duration) -> f32 {
        if !self.paused {
            self.time += dt.as_secs_f32() * self.scale;
        }
        self.time
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Immutable per-frame parameters for the current time.
    pub fn frame(&self, resolution: Resolution) -> FrameParams {
        FrameParams::new(resolution, self.time)
    }
}
