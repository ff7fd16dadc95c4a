//! Browser bindings for the flower simulation.
//!
//! The page owns the canvas, the animation loop and the samplers. Each frame
//! it forwards pointer events, calls `frame(now)`, uploads the point and wave
//! buffers, and plays whatever `drainCommands()` returns.

pub mod keys;

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
mod commands;

#[cfg(target_arch = "wasm32")]
pub use bindings::{start, FlowerSim};
