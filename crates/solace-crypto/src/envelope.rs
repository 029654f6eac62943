//! Self-contained transport envelope.
//!
//! An envelope is `nonce ‖ ciphertext ‖ tag`, framed as standard padded
//! base64 so it can travel in any text field.

use std::{fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_ENGINE};

use crate::{
    cipher::{NONCE_SIZE, TAG_SIZE},
    error::CryptoError,
};

/// Nonce and sealed ciphertext of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// The 12-byte AEAD nonce
    nonce: [u8; NONCE_SIZE],
    /// The ciphertext including 16-byte tag
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Assemble an envelope from its parts.
    pub fn new(nonce: [u8; NONCE_SIZE], ciphertext: Vec<u8>) -> Self {
        Self { nonce, ciphertext }
    }

    /// The nonce this envelope was sealed with.
    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Ciphertext with the authentication tag appended.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Plaintext length (ciphertext length minus authentication tag).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(TAG_SIZE)
    }

    /// Raw `nonce ‖ ciphertext` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Split raw bytes into nonce and ciphertext.
    ///
    /// Only the nonce length is checked here. A body shorter than the tag is
    /// accepted and rejected later by authentication.
    ///
    /// # Errors
    ///
    /// - `MalformedEnvelope`: fewer than [`NONCE_SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let Some((nonce, ciphertext)) = bytes.split_first_chunk::<NONCE_SIZE>() else {
            let len = bytes.len();
            return Err(CryptoError::MalformedEnvelope {
                reason: format!("{len} bytes is shorter than the {NONCE_SIZE}-byte nonce"),
            });
        };

        Ok(Self { nonce: *nonce, ciphertext: ciphertext.to_vec() })
    }

    /// Base64 text form.
    pub fn encode(&self) -> String {
        BASE64_ENGINE.encode(self.to_bytes())
    }

    /// Parse the base64 text form.
    ///
    /// # Errors
    ///
    /// - `MalformedEnvelope`: invalid base64 or fewer than [`NONCE_SIZE`]
    ///   decoded bytes
    pub fn decode(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64_ENGINE.decode(encoded).map_err(|e| CryptoError::MalformedEnvelope {
            reason: format!("invalid base64: {e}"),
        })?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Envelope {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
