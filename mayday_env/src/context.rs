//! Core environment context trait for the Mayday engine.

use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// The central interface for environment interaction.
///
/// This trait abstracts time and randomness so that the session engine can
/// run in both production (tokio) and simulation (virtual clock)
/// environments.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`, OS entropy
/// - **Simulation**: `SimContext` (in `mayday_sim`) - hand-advanced virtual
///   clock, seeded RNG
///
/// # Determinism
///
/// All methods that would normally introduce non-determinism are controlled
/// by the implementation, which makes scripted facilitator sessions
/// reproducible from a single seed.
#[async_trait]
pub trait EnvContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`.
    /// In simulation: advances the virtual clock.
    async fn sleep(&self, duration: Duration);

    /// Derives a deterministic RNG from a seed extension.
    ///
    /// The session engine draws its crisis selection, NPC message delays
    /// and follow-up coin flips from a single derived RNG, so a seeded
    /// context replays the exact same session.
    ///
    /// # Arguments
    /// * `seed_extension` - A value to combine with the global seed
    fn derive_rng(&self, seed_extension: u64) -> ChaCha8Rng;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    /// In simulation, returns the master seed.
    fn seed(&self) -> u64;
}
