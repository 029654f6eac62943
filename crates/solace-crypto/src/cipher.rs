//! Message encryption using an AEAD
//!
//! All functions are pure - nonce bytes must be provided by the caller.
//! This enables deterministic testing; production callers draw the nonce from
//! a cryptographically secure RNG on every call.

use std::fmt;

use crate::{envelope::Envelope, error::CryptoError, kdf::SessionKey};

/// Nonce size shared by both suites (12 bytes)
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size shared by both suites (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Authenticated cipher used to seal envelopes.
///
/// Both suites take a 256-bit key, a 96-bit nonce and append a 128-bit tag,
/// so envelopes have the same layout. They are not interchangeable: an
/// envelope sealed with one suite fails authentication under the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CipherSuite {
    /// AES-256-GCM. Matches the platform crypto API used by web clients.
    #[default]
    Aes256Gcm,
    /// ChaCha20-Poly1305 (RFC 8439). Constant-time without AES hardware.
    ChaCha20Poly1305,
}

impl CipherSuite {
    /// Stable lowercase name, as used in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aes256Gcm => "aes-256-gcm",
            Self::ChaCha20Poly1305 => "chacha20-poly1305",
        }
    }

    /// Seal `plaintext` and return ciphertext with the tag appended.
    ///
    /// # Errors
    ///
    /// - `Encryption`: the AEAD refused the input (plaintext beyond the
    ///   cipher's length limit)
    pub fn seal(
        self,
        key: &SessionKey,
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let sealed = match self {
            Self::Aes256Gcm => {
                use aes_gcm::{
                    Aes256Gcm, Nonce,
                    aead::{Aead, KeyInit},
                };
                Aes256Gcm::new(key.key().into()).encrypt(Nonce::from_slice(nonce), plaintext)
            },
            Self::ChaCha20Poly1305 => {
                use chacha20poly1305::{
                    ChaCha20Poly1305, Nonce,
                    aead::{Aead, KeyInit},
                };
                ChaCha20Poly1305::new(key.key().into()).encrypt(Nonce::from_slice(nonce), plaintext)
            },
        };

        sealed.map_err(|_| CryptoError::Encryption { reason: format!("{self} seal failed") })
    }

    /// Verify the tag and return the plaintext bytes.
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailed`: wrong key, wrong suite, or tampered data
    pub fn open(
        self,
        key: &SessionKey,
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let opened = match self {
            Self::Aes256Gcm => {
                use aes_gcm::{
                    Aes256Gcm, Nonce,
                    aead::{Aead, KeyInit},
                };
                Aes256Gcm::new(key.key().into()).decrypt(Nonce::from_slice(nonce), ciphertext)
            },
            Self::ChaCha20Poly1305 => {
                use chacha20poly1305::{
                    ChaCha20Poly1305, Nonce,
                    aead::{Aead, KeyInit},
                };
                ChaCha20Poly1305::new(key.key().into())
                    .decrypt(Nonce::from_slice(nonce), ciphertext)
            },
        };

        opened.map_err(|_| CryptoError::AuthenticationFailed)
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encrypt a UTF-8 message into an [`Envelope`].
///
/// # Security
///
/// - Caller MUST provide a fresh, cryptographically random nonce per call
/// - Reusing a nonce under the same key breaks confidentiality for both
///   messages (and forgeability for GCM)
pub fn encrypt_message(
    plaintext: &str,
    key: &SessionKey,
    suite: CipherSuite,
    nonce: [u8; NONCE_SIZE],
) -> Result<Envelope, CryptoError> {
    let ciphertext = suite.seal(key, &nonce, plaintext.as_bytes())?;
    Ok(Envelope::new(nonce, ciphertext))
}

/// Decrypt an [`Envelope`] back to the original message.
///
/// # Errors
///
/// - `AuthenticationFailed`: tag does not verify under this key and suite
/// - `InvalidPlaintext`: authenticated bytes are not UTF-8
pub fn decrypt_message(
    envelope: &Envelope,
    key: &SessionKey,
    suite: CipherSuite,
) -> Result<String, CryptoError> {
    let plaintext = suite.open(key, envelope.nonce(), envelope.ciphertext())?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidPlaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::KEY_SIZE;

    const SUITES: [CipherSuite; 2] = [CipherSuite::Aes256Gcm, CipherSuite::ChaCha20Poly1305];

    fn test_key(fill: u8) -> SessionKey {
        let mut key = [0u8; KEY_SIZE];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = (i as u8).wrapping_add(fill);
        }
        SessionKey::from_bytes(key)
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        for suite in SUITES {
            let key = test_key(0);
            let plaintext = "Hôm nay mình rất mệt";

            let envelope = encrypt_message(plaintext, &key, suite, [0xAB; NONCE_SIZE]).unwrap();
            let decrypted = decrypt_message(&envelope, &key, suite).unwrap();

            assert_eq!(decrypted, plaintext, "{suite}");
        }
    }

    #[test]
    fn encrypt_decrypt_empty_message() {
        for suite in SUITES {
            let key = test_key(0);

            let envelope = encrypt_message("", &key, suite, [0x00; NONCE_SIZE]).unwrap();
            assert_eq!(envelope.ciphertext().len(), TAG_SIZE);

            let decrypted = decrypt_message(&envelope, &key, suite).unwrap();
            assert_eq!(decrypted, "");
        }
    }

    #[test]
    fn encrypt_decrypt_large_message() {
        let key = test_key(0);
        let plaintext = "a".repeat(64 * 1024);

        let envelope =
            encrypt_message(&plaintext, &key, CipherSuite::Aes256Gcm, [0xFF; NONCE_SIZE]).unwrap();
        let decrypted = decrypt_message(&envelope, &key, CipherSuite::Aes256Gcm).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn ciphertext_is_plaintext_plus_tag() {
        for suite in SUITES {
            let key = test_key(0);
            let plaintext = "test message";

            let envelope = encrypt_message(plaintext, &key, suite, [0x00; NONCE_SIZE]).unwrap();

            assert_eq!(envelope.ciphertext().len(), plaintext.len() + TAG_SIZE);
            assert_eq!(envelope.plaintext_len(), plaintext.len());
        }
    }

    #[test]
    fn different_nonces_produce_different_ciphertexts() {
        let key = test_key(0);

        let envelope1 =
            encrypt_message("test", &key, CipherSuite::Aes256Gcm, [0x00; NONCE_SIZE]).unwrap();
        let envelope2 =
            encrypt_message("test", &key, CipherSuite::Aes256Gcm, [0xFF; NONCE_SIZE]).unwrap();

        assert_ne!(envelope1.ciphertext(), envelope2.ciphertext());
    }

    #[test]
    fn wrong_key_fails_decryption() {
        for suite in SUITES {
            let envelope =
                encrypt_message("secret message", &test_key(0), suite, [0x00; NONCE_SIZE]).unwrap();

            let result = decrypt_message(&envelope, &test_key(1), suite);
            assert_eq!(result, Err(CryptoError::AuthenticationFailed));
        }
    }

    #[test]
    fn wrong_suite_fails_decryption() {
        let key = test_key(0);
        let envelope =
            encrypt_message("secret", &key, CipherSuite::Aes256Gcm, [0x00; NONCE_SIZE]).unwrap();

        let result = decrypt_message(&envelope, &key, CipherSuite::ChaCha20Poly1305);
        assert_eq!(result, Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn tampered_ciphertext_fails_decryption() {
        for suite in SUITES {
            let key = test_key(0);
            let envelope =
                encrypt_message("original message", &key, suite, [0x00; NONCE_SIZE]).unwrap();

            let mut ciphertext = envelope.ciphertext().to_vec();
            ciphertext[0] ^= 0xFF;
            let tampered = Envelope::new(*envelope.nonce(), ciphertext);

            assert_eq!(
                decrypt_message(&tampered, &key, suite),
                Err(CryptoError::AuthenticationFailed)
            );
        }
    }

    #[test]
    fn tampered_nonce_fails_decryption() {
        let key = test_key(0);
        let envelope =
            encrypt_message("original", &key, CipherSuite::Aes256Gcm, [0x00; NONCE_SIZE]).unwrap();

        let mut nonce = *envelope.nonce();
        nonce[NONCE_SIZE - 1] ^= 0x01;
        let tampered = Envelope::new(nonce, envelope.ciphertext().to_vec());

        assert!(decrypt_message(&tampered, &key, CipherSuite::Aes256Gcm).is_err());
    }

    #[test]
    fn non_utf8_plaintext_is_rejected_after_authentication() {
        let key = test_key(0);
        let nonce = [0x07; NONCE_SIZE];
        let ciphertext = CipherSuite::Aes256Gcm.seal(&key, &nonce, &[0xFF, 0xFE, 0xFD]).unwrap();
        let envelope = Envelope::new(nonce, ciphertext);

        assert_eq!(
            decrypt_message(&envelope, &key, CipherSuite::Aes256Gcm),
            Err(CryptoError::InvalidPlaintext)
        );
    }

    #[test]
    fn aes_gcm_matches_known_answer() {
        // NIST GCM test case 13: zero key, zero nonce, empty plaintext
        let key = SessionKey::from_bytes([0u8; KEY_SIZE]);
        let tag = CipherSuite::Aes256Gcm.seal(&key, &[0u8; NONCE_SIZE], &[]).unwrap();

        assert_eq!(
            tag,
            [
                0x53, 0x0f, 0x8a, 0xfb, 0xc7, 0x45, 0x36, 0xb9, 0xa9, 0x63, 0xb4, 0xf1, 0xc4, 0xcb,
                0x73, 0x8b
            ]
        );
    }

    #[test]
    fn suite_names_are_stable() {
        assert_eq!(CipherSuite::Aes256Gcm.to_string(), "aes-256-gcm");
        assert_eq!(CipherSuite::ChaCha20Poly1305.to_string(), "chacha20-poly1305");
        assert_eq!(CipherSuite::default(), CipherSuite::Aes256Gcm);
    }
}
