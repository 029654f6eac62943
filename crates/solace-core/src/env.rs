//! Environment abstraction for deterministic testing.
//!
//! Decouples encryption and conversation bookkeeping from system resources
//! (entropy, wall clock). Production uses [`SystemEnv`]; tests use a seeded
//! implementation so envelopes and message ids are reproducible.

use solace_crypto::{CryptoError, NONCE_SIZE};

/// Abstract environment providing randomness and time.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - `random_bytes()` reports missing entropy as an error instead of filling
///   the buffer with predictable bytes
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    ///
    /// # Errors
    ///
    /// - `Unavailable`: the platform cannot provide secure randomness
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), CryptoError>;

    /// Milliseconds since the Unix epoch, for message timestamps.
    fn wall_clock_millis(&self) -> u64;

    /// Generates a fresh AEAD nonce.
    ///
    /// Nonces are never derived from a counter: every call draws new bytes.
    fn random_nonce(&self) -> Result<[u8; NONCE_SIZE], CryptoError> {
        let mut nonce = [0u8; NONCE_SIZE];
        self.random_bytes(&mut nonce)?;
        Ok(nonce)
    }
}

/// Production environment using the OS RNG and system clock.
///
/// The RNG uses getrandom which provides OS-level cryptographic randomness
/// (e.g., /dev/urandom on Linux, `crypto.getRandomValues` on wasm).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::disallowed_methods)]
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::fill(buffer)
            .map_err(|e| CryptoError::Unavailable { reason: format!("OS RNG failure: {e}") })
    }

    #[allow(clippy::disallowed_methods)]
    fn wall_clock_millis(&self) -> u64 {
        // A clock before 1970 only skews display timestamps
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_random_bytes_are_random() {
        let env = SystemEnv::new();

        let mut bytes1 = [0u8; 32];
        let mut bytes2 = [0u8; 32];

        env.random_bytes(&mut bytes1).unwrap();
        env.random_bytes(&mut bytes2).unwrap();

        // Extremely unlikely to be equal if random
        assert_ne!(bytes1, bytes2, "Random bytes should differ");
    }

    #[test]
    fn system_env_nonces_differ() {
        let env = SystemEnv::new();

        let nonce1 = env.random_nonce().unwrap();
        let nonce2 = env.random_nonce().unwrap();

        assert_ne!(nonce1, nonce2);
    }

    #[test]
    fn system_env_clock_is_after_2020() {
        let env = SystemEnv::new();
        // 2020-01-01T00:00:00Z
        assert!(env.wall_clock_millis() > 1_577_836_800_000);
    }
}
