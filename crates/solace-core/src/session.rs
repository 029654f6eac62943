//! Conversation session identifiers.
//!
//! A session identifier is the only secret-equivalent input to key
//! derivation, so it is never printed in full.

use std::fmt;

use thiserror::Error;

/// Number of leading characters shown in logs.
const SHORT_LEN: usize = 8;

/// Errors constructing a [`SessionId`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session provider returned an empty identifier.
    #[error("session identifier must not be empty")]
    Empty,
}

/// Opaque identifier of one conversation session.
///
/// Supplied by the session provider and passed to every encrypt/decrypt
/// call. `Debug` and `Display` only show [`SessionId::short`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap an identifier issued by the session provider.
    ///
    /// # Errors
    ///
    /// - `Empty`: the identifier is empty or only whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, SessionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self(id))
    }

    /// Full identifier, for key derivation and transport addressing only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First eight characters, safe for logs.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({}…)", self.short())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}…", self.short())
    }
}
