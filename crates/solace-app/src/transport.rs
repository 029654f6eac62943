//! Message transport port.
//!
//! The pipeline hands sealed envelopes to a [`MessageTransport`] and awaits
//! the server reply. The wire (HTTP, WebSocket) lives outside this crate; the
//! request and reply types are serde structs so an implementation can put
//! them on the wire as JSON directly.

use std::future::Future;

use serde::{Deserialize, Serialize};
use solace_core::SessionId;
use thiserror::Error;

use crate::state::Role;

/// Request to deliver one user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Session the message belongs to.
    pub session_token: String,
    /// Base64 envelope; never plaintext.
    pub envelope: String,
    /// Always [`Role::User`].
    pub role: Role,
    /// Always true.
    pub encrypted: bool,
}

impl OutgoingMessage {
    /// User message carrying `envelope` for `session`.
    pub fn user(session: &SessionId, envelope: String) -> Self {
        Self {
            session_token: session.expose().to_owned(),
            envelope,
            role: Role::User,
            encrypted: true,
        }
    }
}

/// Server reply to a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransportReply {
    /// Id of the assistant reply. Empty if the server assigned none.
    #[serde(default)]
    pub message_id: String,
    /// Id the server assigned to the user message.
    #[serde(default)]
    pub user_message_id: Option<String>,
    /// Assistant reply text. Empty if the model produced nothing.
    #[serde(default)]
    pub ai_reply_text: String,
    /// Server-side crisis classification of the user message.
    #[serde(default)]
    pub crisis_detected_by_server: bool,
}

/// Delivery failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server could not be reached.
    #[error("server unreachable: {reason}")]
    Unreachable {
        /// Failure description
        reason: String,
    },

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The server answered with an error status.
    #[error("server rejected message (status {status}): {reason}")]
    Rejected {
        /// HTTP-style status code
        status: u16,
        /// Failure description
        reason: String,
    },

    /// The reply could not be parsed.
    #[error("invalid server reply: {reason}")]
    InvalidReply {
        /// Failure description
        reason: String,
    },
}

impl TransportError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable { .. } | Self::Timeout => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidReply { .. } => false,
        }
    }
}

/// Delivers sealed messages to the chat service.
///
/// Implementations own timeouts; the pipeline awaits `deliver` without one.
pub trait MessageTransport: Send + Sync {
    /// Deliver `message` and return the server reply.
    ///
    /// # Errors
    ///
    /// Any [`TransportError`]; the pipeline rolls back the optimistic message.
    fn deliver(
        &self,
        message: OutgoingMessage,
    ) -> impl Future<Output = Result<TransportReply, TransportError>> + Send;
}
