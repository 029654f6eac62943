//! Session-bound message cipher.
//!
//! Binds the pure primitives from [`solace_crypto`] to an [`Environment`] for
//! nonce generation. The session key is derived on every call; nothing is
//! cached, so the cipher holds no secret state.

use solace_crypto::{
    CipherSuite, CryptoError, Envelope, KdfParams, decrypt_message, derive_session_key,
    encrypt_message,
};

use crate::{env::Environment, session::SessionId};

/// Cipher parameters shared by every session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CipherConfig {
    /// PBKDF2 salt and iteration count.
    pub kdf: KdfParams,
    /// AEAD used to seal envelopes.
    pub suite: CipherSuite,
}

/// Encrypts and decrypts message bodies for a session.
#[derive(Debug, Clone)]
pub struct MessageCipher<E: Environment> {
    env: E,
    config: CipherConfig,
}

impl<E: Environment> MessageCipher<E> {
    /// Create a cipher drawing nonces from `env`.
    pub fn new(env: E, config: CipherConfig) -> Self {
        Self { env, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Encrypt `plaintext` into a base64 envelope.
    ///
    /// Every call draws a fresh nonce, so encrypting the same text twice
    /// yields two different envelopes.
    ///
    /// # Errors
    ///
    /// - `KeyDerivation`: the session key could not be derived
    /// - `Unavailable`: the environment has no secure randomness
    /// - `Encryption`: the AEAD refused the plaintext
    pub fn encrypt(&self, plaintext: &str, session: &SessionId) -> Result<String, CryptoError> {
        let key = derive_session_key(session.expose(), &self.config.kdf)?;
        let nonce = self.env.random_nonce()?;
        let envelope = encrypt_message(plaintext, &key, self.config.suite, nonce)?;

        tracing::debug!(
            session = session.short(),
            suite = %self.config.suite,
            plaintext_len = plaintext.len(),
            "sealed message envelope"
        );

        Ok(envelope.encode())
    }

    /// Decrypt a base64 envelope produced for the same session.
    ///
    /// # Errors
    ///
    /// - `MalformedEnvelope`: not base64, or shorter than a nonce
    /// - `AuthenticationFailed`: different session, different suite, or
    ///   corrupted data
    /// - `InvalidPlaintext`: authenticated bytes are not UTF-8
    /// - `KeyDerivation`: the session key could not be derived
    pub fn decrypt(&self, envelope: &str, session: &SessionId) -> Result<String, CryptoError> {
        let envelope = Envelope::decode(envelope)?;
        let key = derive_session_key(session.expose(), &self.config.kdf)?;
        let plaintext = decrypt_message(&envelope, &key, self.config.suite)?;

        tracing::debug!(
            session = session.short(),
            suite = %self.config.suite,
            plaintext_len = plaintext.len(),
            "opened message envelope"
        );

        Ok(plaintext)
    }
}
