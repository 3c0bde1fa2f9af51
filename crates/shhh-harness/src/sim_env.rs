//! Simulated environment with virtual time.
//!
//! Time starts at zero and only moves when a test calls [`SimEnv::advance`].
//! Randomness comes from a seeded ChaCha RNG, so the same seed always yields
//! the same message identifiers.

use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shhh_core::env::Environment;

/// Deterministic environment.
///
/// Clones share the clock and the RNG, so a test can keep a handle while the
/// session owns another.
#[derive(Clone)]
pub struct SimEnv {
    clock_nanos: Arc<AtomicU64>,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl std::fmt::Debug for SimEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimEnv").field("now", &self.now()).finish_non_exhaustive()
    }
}

impl SimEnv {
    /// Create an environment at time zero with RNG seeded from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            clock_nanos: Arc::new(AtomicU64::new(0)),
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }

    /// Move the clock forward by `by` and return the new time.
    pub fn advance(&self, by: Duration) -> Duration {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let now = self.clock_nanos.fetch_add(by, Ordering::SeqCst).saturating_add(by);
        Duration::from_nanos(now)
    }
}

impl Environment for SimEnv {
    type Instant = Duration;

    fn now(&self) -> Duration {
        Duration::from_nanos(self.clock_nanos.load(Ordering::SeqCst))
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
    }
}
