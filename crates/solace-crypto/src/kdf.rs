//! Session key derivation using PBKDF2-HMAC-SHA256

use std::fmt;

use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::CryptoError;

/// Application-wide salt for session key derivation.
pub const DEFAULT_SALT: &[u8] = b"solace.session-key.v1";

/// PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Session key size in bytes (256-bit).
pub const KEY_SIZE: usize = 32;

/// PBKDF2 parameters shared by every session.
///
/// Both ends of an exchange must use identical parameters, otherwise the
/// derived keys differ and every envelope fails authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParams {
    salt: Vec<u8>,
    iterations: u32,
}

impl KdfParams {
    /// Create parameters with a custom salt and iteration count.
    ///
    /// # Errors
    ///
    /// - `KeyDerivation`: salt is empty or iterations is zero
    pub fn new(salt: impl Into<Vec<u8>>, iterations: u32) -> Result<Self, CryptoError> {
        let salt = salt.into();
        if salt.is_empty() {
            return Err(CryptoError::KeyDerivation { reason: "salt must not be empty".into() });
        }
        if iterations == 0 {
            return Err(CryptoError::KeyDerivation {
                reason: "iteration count must be at least 1".into(),
            });
        }
        Ok(Self { salt, iterations })
    }

    /// Salt bytes.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self { salt: DEFAULT_SALT.to_vec(), iterations: DEFAULT_ITERATIONS }
    }
}

/// A 256-bit symmetric key scoped to one session.
///
/// Usable for both sealing and opening. Key bytes are zeroized on drop and
/// never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey {
    key: [u8; KEY_SIZE],
}

impl SessionKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// 32-byte symmetric key for the AEAD.
    pub fn key(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive the session key for a session identifier.
///
/// Deterministic: the same identifier and parameters always produce the same
/// key. An empty identifier is still derivable; rejecting it is the session
/// layer's job.
///
/// # Errors
///
/// - `KeyDerivation`: the PBKDF2 primitive rejected its inputs
pub fn derive_session_key(session_id: &str, params: &KdfParams) -> Result<SessionKey, CryptoError> {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(session_id.as_bytes(), &params.salt, params.iterations, &mut key)
        .map_err(|e| CryptoError::KeyDerivation { reason: e.to_string() })?;

    Ok(SessionKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> KdfParams {
        KdfParams::new(DEFAULT_SALT, 16).unwrap()
    }

    #[test]
    fn default_params_match_constants() {
        let params = KdfParams::default();
        assert_eq!(params.salt(), DEFAULT_SALT);
        assert_eq!(params.iterations(), 100_000);
    }

    #[test]
    fn derive_is_deterministic() {
        let params = fast_params();

        let key1 = derive_session_key("sess-abc123", &params).unwrap();
        let key2 = derive_session_key("sess-abc123", &params).unwrap();

        assert_eq!(key1, key2, "same inputs must produce same key");
    }

    #[test]
    fn different_sessions_produce_different_keys() {
        let params = fast_params();

        let key_a = derive_session_key("sess-a", &params).unwrap();
        let key_b = derive_session_key("sess-b", &params).unwrap();

        assert_ne!(key_a, key_b, "different sessions must produce different keys");
    }

    #[test]
    fn different_salts_produce_different_keys() {
        let key_a =
            derive_session_key("sess", &KdfParams::new(b"salt-a".to_vec(), 16).unwrap()).unwrap();
        let key_b =
            derive_session_key("sess", &KdfParams::new(b"salt-b".to_vec(), 16).unwrap()).unwrap();

        assert_ne!(key_a, key_b);
    }

    #[test]
    fn different_iterations_produce_different_keys() {
        let key_a = derive_session_key("sess", &KdfParams::new(DEFAULT_SALT, 1).unwrap()).unwrap();
        let key_b = derive_session_key("sess", &KdfParams::new(DEFAULT_SALT, 2).unwrap()).unwrap();

        assert_ne!(key_a, key_b);
    }

    #[test]
    fn matches_rfc_7914_pbkdf2_sha256_vector() {
        // RFC 7914 section 11: P = "passwd", S = "salt", c = 1, dkLen = 64
        let params = KdfParams::new(b"salt".to_vec(), 1).unwrap();
        let key = derive_session_key("passwd", &params).unwrap();

        let expected = [
            0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44,
            0xb6, 0x05, 0xf9, 0x41, 0x85, 0x21, 0x6d, 0xde, 0x04, 0x65, 0xe6, 0x8b, 0x9d, 0x57,
            0xc2, 0x0d, 0xac, 0xbc,
        ];
        assert_eq!(key.key(), &expected);
    }

    #[test]
    fn empty_session_id_is_derivable() {
        let key = derive_session_key("", &fast_params()).unwrap();
        assert_eq!(key.key().len(), KEY_SIZE);
    }

    #[test]
    fn empty_salt_is_rejected() {
        let result = KdfParams::new(Vec::new(), 1000);
        assert!(matches!(result, Err(CryptoError::KeyDerivation { .. })));
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let result = KdfParams::new(DEFAULT_SALT, 0);
        assert!(matches!(result, Err(CryptoError::KeyDerivation { .. })));
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = SessionKey::from_bytes([0xAB; KEY_SIZE]);
        let debug = format!("{key:?}");
        assert!(!debug.contains("171"), "key bytes must not be printed");
        assert!(debug.contains("redacted"));
    }
}
