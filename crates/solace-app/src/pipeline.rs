//! Chat send pipeline.
//!
//! Drives one send attempt through
//! `Idle -> Checking -> {Blocked | Encrypting -> Sending -> Done | Failed}`.
//!
//! # Invariants
//!
//! - Text the crisis screen flags, or that could not be screened, is never
//!   encrypted or handed to the transport.
//! - At most one attempt is in flight. A concurrent `send` is rejected with
//!   [`PipelineError::SendInProgress`] and makes no transport call.
//! - After a failed attempt the conversation equals its state before the
//!   attempt. The optimistic user message is removed on transport failure and
//!   on cancellation (the send future dropped mid-flight).
//! - No lock is held across the transport await or a presenter call.

use std::sync::{Mutex, MutexGuard, PoisonError};

use solace_core::{
    CipherConfig, CrisisDetector, CrisisResources, CrisisScreen, CryptoError, Environment,
    KeywordSet, MessageCipher, SessionId,
};
use thiserror::Error;

use crate::{
    notices::{REPLY_FALLBACK, SEND_FAILED, WELCOME},
    presenter::{AlertTrigger, CrisisAlert, CrisisPresenter},
    state::{ChatMessage, Conversation, HistoryEntry, Role},
    transport::{MessageTransport, OutgoingMessage, TransportError, TransportReply},
};

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Key derivation and AEAD parameters.
    pub cipher: CipherConfig,
    /// Phrases for the default keyword screen.
    pub keywords: KeywordSet,
    /// Hotlines shown on the crisis interstitial.
    pub resources: CrisisResources,
    /// Greeting that opens a new conversation. `None` starts empty.
    pub welcome: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cipher: CipherConfig::default(),
            keywords: KeywordSet::vietnamese(),
            resources: CrisisResources::vietnam(),
            welcome: Some(WELCOME.to_owned()),
        }
    }
}

/// Phase of the attempt in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPhase {
    /// No attempt in flight.
    #[default]
    Idle,
    /// Screening the text.
    Checking,
    /// Sealing the envelope.
    Encrypting,
    /// Awaiting the transport.
    Sending,
}

/// Terminal result of a successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Held back by the crisis screen; nothing was encrypted or sent.
    Blocked {
        /// What raised the alert.
        trigger: AlertTrigger,
    },
    /// Delivered and answered.
    Delivered {
        /// Final id of the user message (server id, or the local id if the
        /// server assigned none).
        message_id: String,
        /// Id of the assistant reply.
        reply_id: String,
        /// The server flagged the message; the interstitial was shown.
        crisis_flagged: bool,
    },
}

/// Send failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The text is empty or only whitespace.
    #[error("message is empty")]
    EmptyMessage,

    /// Another attempt is still in flight.
    #[error("a message is still sending")]
    SendInProgress,

    /// The crisis interstitial must be dismissed first.
    #[error("crisis alert is open")]
    AlertOpen,

    /// The envelope could not be sealed; nothing was sent.
    #[error("encryption failed: {0}")]
    Encryption(#[from] CryptoError),

    /// Delivery failed; the optimistic message was rolled back.
    #[error("delivery failed: {0}")]
    Transport(#[from] TransportError),
}

impl PipelineError {
    /// Returns true if sending the same text again may succeed without user
    /// action other than retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SendInProgress => true,
            Self::Transport(err) => err.is_transient(),
            Self::EmptyMessage | Self::AlertOpen | Self::Encryption(_) => false,
        }
    }
}

#[derive(Debug)]
struct PipelineState {
    phase: SendPhase,
    alert_open: bool,
    conversation: Conversation,
    /// Bumped on every conversation change.
    revision: u64,
    next_local_id: u64,
}

fn lock(state: &Mutex<PipelineState>) -> MutexGuard<'_, PipelineState> {
    // State stays consistent between statements, so a poisoned lock is usable
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Screens, encrypts and delivers chat messages for one conversation.
///
/// `send` takes `&self`; share the pipeline behind an `Arc` to call it from
/// several tasks. Concurrent sends are rejected, not queued.
///
/// # Type Parameters
///
/// - `E`: randomness and clock
/// - `S`: crisis screen ([`CrisisDetector`] by default)
/// - `T`: message transport
/// - `P`: UI presenter
pub struct ChatSendPipeline<E, S, T, P>
where
    E: Environment,
{
    env: E,
    cipher: MessageCipher<E>,
    screen: S,
    transport: T,
    presenter: P,
    resources: CrisisResources,
    state: Mutex<PipelineState>,
}

impl<E, T, P> ChatSendPipeline<E, CrisisDetector, T, P>
where
    E: Environment,
    T: MessageTransport,
    P: CrisisPresenter,
{
    /// Create a pipeline screening with the configured keyword list.
    pub fn new(env: E, config: PipelineConfig, transport: T, presenter: P) -> Self {
        let screen = CrisisDetector::new(config.keywords.clone());
        Self::with_screen(env, config, screen, transport, presenter)
    }
}

impl<E, S, T, P> ChatSendPipeline<E, S, T, P>
where
    E: Environment,
    S: CrisisScreen,
    T: MessageTransport,
    P: CrisisPresenter,
{
    /// Create a pipeline with a custom crisis screen.
    ///
    /// `config.keywords` is ignored.
    pub fn with_screen(
        env: E,
        config: PipelineConfig,
        screen: S,
        transport: T,
        presenter: P,
    ) -> Self {
        let conversation = match config.welcome {
            Some(text) => Conversation::with_welcome(text, env.wall_clock_millis()),
            None => Conversation::new(),
        };
        let state = PipelineState {
            phase: SendPhase::Idle,
            alert_open: false,
            conversation,
            revision: 0,
            next_local_id: 0,
        };

        Self {
            cipher: MessageCipher::new(env.clone(), config.cipher),
            env,
            screen,
            transport,
            presenter,
            resources: config.resources,
            state: Mutex::new(state),
        }
    }

    /// Phase of the attempt in flight.
    pub fn phase(&self) -> SendPhase {
        lock(&self.state).phase
    }

    /// True while the crisis interstitial is shown.
    pub fn is_alert_open(&self) -> bool {
        lock(&self.state).alert_open
    }

    /// Snapshot of the conversation.
    pub fn conversation(&self) -> Conversation {
        lock(&self.state).conversation.clone()
    }

    /// Cipher used for outgoing messages and history.
    pub fn cipher(&self) -> &MessageCipher<E> {
        &self.cipher
    }

    /// Close the crisis interstitial so sending is possible again.
    ///
    /// Returns false if no alert was open.
    pub fn dismiss_crisis_alert(&self) -> bool {
        let was_open = std::mem::replace(&mut lock(&self.state).alert_open, false);
        if was_open {
            tracing::info!("crisis alert dismissed");
        }
        was_open
    }

    /// Replace the conversation with stored history.
    ///
    /// Unreadable entries show a placeholder. Entries are decrypted without
    /// holding the state lock; if a send starts or changes the conversation
    /// meanwhile, the load is refused rather than discarding that message.
    ///
    /// # Errors
    ///
    /// - `SendInProgress`: an attempt is in flight, or one changed the
    ///   conversation while the history was decrypted
    pub fn load_history(
        &self,
        entries: &[HistoryEntry],
        session: &SessionId,
    ) -> Result<(), PipelineError> {
        let revision = {
            let state = lock(&self.state);
            if state.phase != SendPhase::Idle {
                return Err(PipelineError::SendInProgress);
            }
            state.revision
        };

        let conversation = Conversation::from_history(entries, &self.cipher, session);

        let mut state = lock(&self.state);
        if state.phase != SendPhase::Idle || state.revision != revision {
            return Err(PipelineError::SendInProgress);
        }
        state.conversation = conversation;
        state.revision += 1;
        drop(state);

        tracing::debug!(session = session.short(), entries = entries.len(), "history loaded");
        Ok(())
    }

    /// Screen, encrypt and deliver `plaintext`.
    ///
    /// Returns [`SendOutcome::Blocked`] when the screen flags the text or
    /// fails; the interstitial is shown and further sends are refused until
    /// [`dismiss_crisis_alert`](Self::dismiss_crisis_alert). On delivery the
    /// user message and the assistant reply are in the conversation.
    ///
    /// # Errors
    ///
    /// - `EmptyMessage`: nothing to send
    /// - `SendInProgress`: another attempt is in flight
    /// - `AlertOpen`: the interstitial has not been dismissed
    /// - `Encryption`: sealing failed; the retry notice is shown
    /// - `Transport`: delivery failed; the optimistic message is removed and
    ///   the retry notice is shown
    pub async fn send(
        &self,
        plaintext: &str,
        session: &SessionId,
    ) -> Result<SendOutcome, PipelineError> {
        if plaintext.trim().is_empty() {
            return Err(PipelineError::EmptyMessage);
        }
        let mut flight = self.begin()?;

        if let Some(trigger) = self.check(plaintext, session) {
            flight.open_alert();
            drop(flight);
            self.present_alert(trigger.clone());
            return Ok(SendOutcome::Blocked { trigger });
        }

        flight.advance(SendPhase::Encrypting);
        let envelope = match self.cipher.encrypt(plaintext, session) {
            Ok(envelope) => envelope,
            Err(error) => {
                drop(flight);
                tracing::warn!(session = session.short(), %error, "message not sealed");
                self.presenter.show_error(SEND_FAILED);
                return Err(error.into());
            },
        };

        flight.advance(SendPhase::Sending);
        let local_id = flight.append_pending(plaintext, self.env.wall_clock_millis());

        match self.transport.deliver(OutgoingMessage::user(session, envelope)).await {
            Ok(reply) => {
                let crisis_flagged = reply.crisis_detected_by_server;
                let outcome = flight.complete(&local_id, reply, self.env.wall_clock_millis());
                drop(flight);

                tracing::info!(session = session.short(), crisis_flagged, "message delivered");
                if crisis_flagged {
                    self.present_alert(AlertTrigger::Server);
                }
                Ok(outcome)
            },
            Err(error) => {
                flight.rollback();
                drop(flight);

                tracing::warn!(
                    session = session.short(),
                    %error,
                    transient = error.is_transient(),
                    "delivery failed, optimistic message removed"
                );
                self.presenter.show_error(SEND_FAILED);
                Err(error.into())
            },
        }
    }

    fn begin(&self) -> Result<InFlight<'_>, PipelineError> {
        let mut state = lock(&self.state);
        if state.phase != SendPhase::Idle {
            return Err(PipelineError::SendInProgress);
        }
        if state.alert_open {
            return Err(PipelineError::AlertOpen);
        }
        state.phase = SendPhase::Checking;
        Ok(InFlight { state: &self.state, pending: None })
    }

    fn check(&self, plaintext: &str, session: &SessionId) -> Option<AlertTrigger> {
        match self.screen.screen(plaintext) {
            Ok(assessment) if assessment.is_crisis() => {
                tracing::warn!(
                    session = session.short(),
                    severity = ?assessment.severity,
                    categories = ?assessment.categories,
                    "crisis screen matched, message held back"
                );
                Some(AlertTrigger::ClientKeyword {
                    severity: assessment.severity,
                    categories: assessment.categories,
                })
            },
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(
                    session = session.short(),
                    %error,
                    "crisis screen failed, message held back"
                );
                Some(AlertTrigger::ScreenFailure)
            },
        }
    }

    fn present_alert(&self, trigger: AlertTrigger) {
        let alert = CrisisAlert { trigger, resources: self.resources.clone() };
        self.presenter.show_crisis(&alert);
    }
}

/// Marks an attempt in flight; returns the pipeline to `Idle` on drop and
/// removes a still-pending optimistic message.
struct InFlight<'a> {
    state: &'a Mutex<PipelineState>,
    pending: Option<String>,
}

impl<'a> InFlight<'a> {
    fn lock(&self) -> MutexGuard<'a, PipelineState> {
        lock(self.state)
    }

    fn advance(&self, phase: SendPhase) {
        self.lock().phase = phase;
    }

    fn append_pending(&mut self, text: &str, timestamp_millis: u64) -> String {
        let mut state = self.lock();
        state.next_local_id += 1;
        let id = format!("local-{}", state.next_local_id);
        state.conversation.push(ChatMessage::new(id.clone(), Role::User, text, timestamp_millis));
        state.revision += 1;
        drop(state);

        self.pending = Some(id.clone());
        id
    }

    fn open_alert(&self) {
        self.lock().alert_open = true;
    }

    fn rollback(&mut self) {
        if let Some(id) = self.pending.take() {
            let mut state = self.lock();
            state.conversation.remove(&id);
            state.revision += 1;
        }
    }

    /// Record the reply. A server crisis flag opens the alert before the
    /// attempt is released.
    fn complete(
        &mut self,
        local_id: &str,
        reply: TransportReply,
        timestamp_millis: u64,
    ) -> SendOutcome {
        self.pending = None;
        let mut state = self.lock();
        state.alert_open |= reply.crisis_detected_by_server;
        state.revision += 1;

        let message_id = match reply.user_message_id {
            Some(id) if !id.is_empty() => {
                state.conversation.rename(local_id, id.clone());
                id
            },
            _ => local_id.to_owned(),
        };
        let reply_id = if reply.message_id.is_empty() {
            format!("ai-{}", state.next_local_id)
        } else {
            reply.message_id
        };
        let text = if reply.ai_reply_text.trim().is_empty() {
            REPLY_FALLBACK.to_owned()
        } else {
            reply.ai_reply_text
        };
        state
            .conversation
            .push(ChatMessage::new(reply_id.clone(), Role::Assistant, text, timestamp_millis));

        SendOutcome::Delivered {
            message_id,
            reply_id,
            crisis_flagged: reply.crisis_detected_by_server,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.rollback();
        self.lock().phase = SendPhase::Idle;
    }
}
