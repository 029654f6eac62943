//! Seeded environment for deterministic tests.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use solace_core::{CryptoError, Environment};

/// Virtual clock start: 2023-11-14T22:13:20Z.
const EPOCH_MILLIS: u64 = 1_700_000_000_000;

/// Seeded environment with a virtual clock.
///
/// Clones share the RNG, clock and counters, so a test can keep a handle
/// while the pipeline owns another.
#[derive(Debug, Clone)]
pub struct SimEnv {
    rng: Arc<Mutex<ChaCha8Rng>>,
    clock: Arc<AtomicU64>,
    draws: Arc<AtomicUsize>,
    entropy: Arc<AtomicBool>,
}

impl SimEnv {
    /// Environment whose random bytes are fixed by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            clock: Arc::new(AtomicU64::new(EPOCH_MILLIS)),
            draws: Arc::new(AtomicUsize::new(0)),
            entropy: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Make every `random_bytes` call fail, as on a platform without a
    /// secure RNG.
    #[must_use]
    pub fn without_entropy(self) -> Self {
        self.set_entropy(false);
        self
    }

    /// Enable or disable entropy for all clones.
    pub fn set_entropy(&self, available: bool) {
        self.entropy.store(available, Ordering::SeqCst);
    }

    /// Move the virtual clock forward.
    pub fn advance(&self, millis: u64) {
        self.clock.fetch_add(millis, Ordering::SeqCst);
    }

    /// Number of `random_bytes` calls so far, failed ones included.
    ///
    /// Every encryption draws exactly one nonce, so this counts encryption
    /// attempts.
    pub fn random_draws(&self) -> usize {
        self.draws.load(Ordering::SeqCst)
    }
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Environment for SimEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        self.draws.fetch_add(1, Ordering::SeqCst);
        if !self.entropy.load(Ordering::SeqCst) {
            return Err(CryptoError::Unavailable { reason: "simulated entropy failure".into() });
        }
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buffer);
        Ok(())
    }

    fn wall_clock_millis(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_bytes() {
        let a = SimEnv::with_seed(7);
        let b = SimEnv::with_seed(7);

        assert_eq!(a.random_nonce().unwrap(), b.random_nonce().unwrap());
    }

    #[test]
    fn successive_nonces_differ() {
        let env = SimEnv::with_seed(7);

        assert_ne!(env.random_nonce().unwrap(), env.random_nonce().unwrap());
        assert_eq!(env.random_draws(), 2);
    }

    #[test]
    fn entropy_can_be_removed() {
        let env = SimEnv::with_seed(1).without_entropy();

        assert!(matches!(env.random_nonce(), Err(CryptoError::Unavailable { .. })));
        assert_eq!(env.random_draws(), 1);

        env.set_entropy(true);
        assert!(env.random_nonce().is_ok());
    }

    #[test]
    fn clock_is_virtual_and_shared() {
        let env = SimEnv::default();
        let clone = env.clone();

        env.advance(1_000);

        assert_eq!(clone.wall_clock_millis(), EPOCH_MILLIS + 1_000);
    }
}
