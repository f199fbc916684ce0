//! Shared value types for the papillon workspace.
//!
//! # Invariants
//! - Every value here is immutable per frame: evaluation code receives
//!   `FrameParams` by reference and never writes back.

mod types;

pub use types::{FrameParams, Ray, Resolution};
