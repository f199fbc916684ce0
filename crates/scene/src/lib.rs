//! Scene builder: animated butterflies placed procedurally around static scenery.
//!
//! # Invariants
//! - The scene is a pure function of `(point, time)`. Layout parameters are
//!   fixed at construction and never mutated by evaluation.
//! - Distance and colour lookups share one per-instance sampler, so colour
//!   and geometry agree bit-for-bit at silhouettes.
//! - Per-instance jitter comes from the `fract(sin(n) * K)` hash, never a
//!   stateful RNG.

mod butterfly;
mod inspector;
mod layout;
mod scene;
mod scenery;

pub use butterfly::{WingMotion, wings_distance};
pub use inspector::{InstanceInfo, SceneInspector, SceneSummary};
pub use layout::{GridLayout, Placement, RadialLayout};
pub use scene::{InstanceSample, MAX_INSTANCES, Scene, SceneConfig, SceneError, SceneVariant};
pub use scenery::{GroundMode, GroundPlane, Lamppost};
