//! Mayday Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" abstraction allowing the Mayday
//! crisis-simulation engine to run in both **Production** (tokio, real
//! inference endpoint) and **Simulation** (virtual clock, scripted
//! generator) environments.
//!
//! # Core Concept
//!
//! All sources of non-determinism are intercepted:
//! - Time (`now()`, `sleep()`)
//! - Randomness (`derive_rng()`)
//! - The external text-generation endpoint (`TextGenerator`)
//!
//! By deriving all entropy from a single 64-bit seed, any session becomes
//! reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use mayday_env::{EnvContext, TokioContext};
//! use std::time::Duration;
//!
//! async fn facilitator_loop<C: EnvContext>(ctx: &C) {
//!     loop {
//!         ctx.sleep(Duration::from_secs(1)).await;
//!         // advance the session engine by one tick
//!     }
//! }
//! ```

mod context;
mod error;
mod generator;
mod http;
mod tokio_impl;

pub use context::EnvContext;
pub use error::GeneratorError;
pub use generator::{ChatMessage, TextGenerator};
pub use http::{Endpoint, HttpTextGenerator};
pub use tokio_impl::TokioContext;
