//! Solace Cryptographic Primitives
//!
//! Cryptographic building blocks for protecting chat content before it leaves
//! the client. Pure functions with deterministic outputs. Callers provide the
//! nonce bytes, which keeps every function reproducible under test.
//!
//! # Key Lifecycle
//!
//! Each conversation session derives its own symmetric key. Nothing is stored:
//! the key is recomputed from the session identifier whenever it is needed.
//!
//! ```text
//! Session Identifier
//!        │
//!        ▼
//! PBKDF2-HMAC-SHA256 (fixed salt, 100 000 iterations) → Session Key
//!        │
//!        ▼
//! AEAD (AES-256-GCM | ChaCha20-Poly1305, random 12-byte nonce)
//!        │
//!        ▼
//! base64(nonce ‖ ciphertext ‖ tag) → Envelope
//! ```
//!
//! # Security
//!
//! Authenticity:
//! - Both cipher suites are AEADs with a 16-byte tag
//! - Any modified byte in the envelope fails authentication
//! - Failed authentication tag -> reject envelope, never partial plaintext
//!
//! Nonce uniqueness:
//! - Nonces are 12 random bytes per encryption, never a counter
//! - Callers MUST draw them from a cryptographically secure source
//!
//! Trust assumption:
//! - The session key is a pure function of the session identifier and public
//!   parameters. Anyone who learns the session identifier can derive the key.
//! - The session identifier is therefore the secret. This protects content at
//!   rest and in logs; it is NOT end-to-end encryption against a server that
//!   knows session identifiers.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod kdf;

pub use cipher::{CipherSuite, NONCE_SIZE, TAG_SIZE, decrypt_message, encrypt_message};
pub use envelope::Envelope;
pub use error::CryptoError;
pub use kdf::{
    DEFAULT_ITERATIONS, DEFAULT_SALT, KEY_SIZE, KdfParams, SessionKey, derive_session_key,
};
