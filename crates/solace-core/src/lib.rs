//! Solace core
//!
//! Session-bound message encryption and client-side crisis screening. Both are
//! pure with respect to their inputs: session identifiers, configuration and
//! randomness are passed in explicitly, never read from ambient storage.
//!
//! # Components
//!
//! - [`Environment`]: randomness and wall-clock source ([`SystemEnv`] in
//!   production, a seeded implementation in tests)
//! - [`SessionId`]: opaque, redacted conversation identifier
//! - [`MessageCipher`]: derive the session key and seal/open envelopes
//! - [`CrisisDetector`]: keyword screen gating every outgoing message
//! - [`CrisisResources`]: static emergency contacts for the crisis interstitial

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cipher;
pub mod crisis;
pub mod env;
pub mod resources;
pub mod session;

pub use cipher::{CipherConfig, MessageCipher};
pub use crisis::{
    CrisisAssessment, CrisisCategory, CrisisDetector, CrisisScreen, KeywordSet, ScreenError,
    Severity,
};
pub use env::{Environment, SystemEnv};
pub use resources::{CrisisResources, EmergencyContact};
pub use session::{SessionError, SessionId};
pub use solace_crypto::{CipherSuite, CryptoError, KdfParams, NONCE_SIZE};
