//! Error types for cryptographic operations.

use thiserror::Error;

/// Errors from key derivation, encryption and decryption.
///
/// Decryption failures are split by cause so callers can tell a corrupted
/// transport from a key mismatch. All three are reported by
/// [`CryptoError::is_decryption_failure`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key derivation parameters were rejected or the KDF failed.
    #[error("key derivation failed: {reason}")]
    KeyDerivation {
        /// Description of the failure
        reason: String,
    },

    /// The AEAD refused to seal the plaintext.
    #[error("encryption failed: {reason}")]
    Encryption {
        /// Description of the failure
        reason: String,
    },

    /// Envelope is not valid base64 or is shorter than a nonce.
    #[error("malformed envelope: {reason}")]
    MalformedEnvelope {
        /// Description of the failure
        reason: String,
    },

    /// Tag did not verify: wrong session, wrong suite, or tampered data.
    #[error("authentication failed: key mismatch or corrupted data")]
    AuthenticationFailed,

    /// Authenticated plaintext is not valid UTF-8.
    #[error("decrypted plaintext is not valid UTF-8")]
    InvalidPlaintext,

    /// The platform cannot provide a required primitive (e.g. entropy).
    #[error("cryptographic primitive unavailable: {reason}")]
    Unavailable {
        /// Description of the missing capability
        reason: String,
    },
}

impl CryptoError {
    /// Returns true if this error came from opening an envelope.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(
            self,
            Self::MalformedEnvelope { .. } | Self::AuthenticationFailed | Self::InvalidPlaintext
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decryption_failures_are_classified() {
        assert!(CryptoError::MalformedEnvelope { reason: "short".into() }.is_decryption_failure());
        assert!(CryptoError::AuthenticationFailed.is_decryption_failure());
        assert!(CryptoError::InvalidPlaintext.is_decryption_failure());
    }

    #[test]
    fn other_failures_are_not_decryption_failures() {
        assert!(!CryptoError::KeyDerivation { reason: "salt".into() }.is_decryption_failure());
        assert!(!CryptoError::Encryption { reason: "aead".into() }.is_decryption_failure());
        assert!(!CryptoError::Unavailable { reason: "rng".into() }.is_decryption_failure());
    }
}
