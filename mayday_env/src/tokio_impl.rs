//! Production implementation of EnvContext using Tokio.

use crate::EnvContext;
use async_trait::async_trait;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Production context backed by Tokio and OS entropy.
///
/// This is the "real" implementation used when a facilitator runs a live
/// exercise. Time comes from the system clock, randomness from OsRng.
pub struct TokioContext {
    /// Start time for monotonic duration calculations
    start: Instant,
}

impl TokioContext {
    /// Creates a new TokioContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Creates an Arc-wrapped context for sharing across tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnvContext for TokioContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn derive_rng(&self, _seed_extension: u64) -> ChaCha8Rng {
        // In production, every derived RNG is freshly seeded from OS entropy
        use rand::rngs::OsRng;
        ChaCha8Rng::seed_from_u64(OsRng.next_u64())
    }

    fn seed(&self) -> u64 {
        // Production is not seeded
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[tokio::test]
    async fn test_tokio_context_time() {
        let ctx = TokioContext::new();
        let t1 = ctx.now();
        ctx.sleep(Duration::from_millis(10)).await;
        let t2 = ctx.now();

        assert!(t2 > t1);
        assert!(t2 - t1 >= Duration::from_millis(10));
    }

    #[test]
    fn test_tokio_context_rng_is_entropic() {
        let ctx = TokioContext::new();
        let a: u64 = ctx.derive_rng(1).gen();
        let b: u64 = ctx.derive_rng(1).gen();

        // In production, derived RNGs should differ (entropy-seeded)
        assert_ne!(a, b);
    }

    #[test]
    fn test_tokio_context_seed() {
        let ctx = TokioContext::new();
        assert_eq!(ctx.seed(), 0);
    }
}
