//! Signed distance building blocks: primitives, boolean composition,
//! point transforms and the procedural hash used for per-instance jitter.
//!
//! # Invariants
//! - Every function here is pure. Same inputs, same bits out.
//! - Primitives are exact distances, so sphere tracing never oversteps.
//! - Degenerate shape parameters yield `f32::INFINITY` ("no surface")
//!   instead of NaN.

mod field;
mod hash;
pub mod ops;
pub mod primitives;
mod transform;

pub use field::{DistanceField, SceneField};
pub use hash::{HashKey, fract};
pub use transform::rotate_y;
