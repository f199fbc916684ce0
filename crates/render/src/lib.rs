//! CPU rendering for signed distance scenes.
//!
//! # Invariants
//! - Renderers never mutate the scene. Every pixel is a pure function of
//!   the scene, the config and the immutable per-frame `FrameParams`.
//! - Marching is bounded: at most `max_steps` field evaluations per ray.
//!   Running out of steps is a miss, never a hit.
//! - Shaded colours are clamped to [0, 1] before they reach a frame.
//!
//! Rows are traced in parallel with rayon; the end of the parallel
//! reduction is the frame barrier.

mod camera;
mod clock;
mod config;
mod frame;
mod march;
mod normal;
mod renderer;
mod shade;
mod stats;

pub use camera::Camera;
pub use clock::FrameClock;
pub use config::{ConfigError, Preset, RenderConfig};
pub use frame::{Frame, FrameError, luminance};
pub use march::{MarchConfig, MarchResult, MissReason, march};
pub use normal::estimate_normal;
pub use renderer::{CpuRenderer, DebugTextRenderer, PixelSample, RenderedFrame, Renderer};
pub use shade::{Background, LampGlow, Light, ShadingConfig};
pub use stats::{FrameStats, FrameTimer};
