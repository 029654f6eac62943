//! Application layer for Solace chat
//!
//! The send pipeline and the conversation view model, decoupled from the UI
//! and the network so the same code runs in production and in deterministic
//! tests.
//!
//! # Components
//!
//! - [`ChatSendPipeline`]: crisis screen, encryption, delivery and rollback
//! - [`Conversation`]: ordered plaintext messages shown to the user
//! - [`MessageTransport`]: port to the chat service
//! - [`CrisisPresenter`]: port to the UI for the crisis interstitial and
//!   notices
//! - [`display_text`]: decrypt stored content with a placeholder fallback

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod display;
pub mod notices;
mod pipeline;
mod presenter;
mod state;
mod transport;

pub use display::display_text;
pub use pipeline::{ChatSendPipeline, PipelineConfig, PipelineError, SendOutcome, SendPhase};
pub use presenter::{AlertTrigger, CrisisAlert, CrisisPresenter};
pub use state::{ChatMessage, Conversation, HistoryEntry, Role};
pub use transport::{MessageTransport, OutgoingMessage, TransportError, TransportReply};
