//! wgpu render backend: the scene as a fullscreen fragment shader.
//!
//! The WGSL is generated from the same [`papillon_render::RenderConfig`] the
//! CPU renderer uses, so both paths evaluate the same field with the same
//! constants.
//!
//! # Invariants
//! - The renderer never mutates the scene. Per frame it writes one uniform
//!   buffer (`resolution`, `time`) and issues one draw.
//! - Shader or pipeline rejection is a setup error, never a silent black frame.
//! - Animation time comes from the application clock, not the render loop.

mod gpu;
mod shaders;

pub use gpu::{GpuContext, GpuError, WgpuRenderer};
pub use shaders::{PRELUDE, TRACER, scene_shader};
