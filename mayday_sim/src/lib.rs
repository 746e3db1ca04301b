//! Mayday Deterministic Exercise Harness
//!
//! This crate runs the crisis engine end to end under a controlled
//! environment. All sources of non-determinism are intercepted:
//!
//! - **Time**: a virtual clock the harness advances by hand
//! - **Generation**: a scripted reply queue with fault injection
//! - **Randomness**: every stream derived from a single 64-bit seed
//!
//! Each exercise plays one facilitation script against the engine and
//! asserts the externally visible outcome, including the final report.

mod context;
mod generator;
mod runner;
pub mod exercises;

pub use context::SimContext;
pub use exercises::ExerciseId;
pub use generator::{ScriptedGenerator, DEFAULT_REPLY};
pub use runner::{run_wall_clock, ExerciseResult, ExerciseRunner};
