//! Conversation state shown by the chat screen.
//!
//! A [`Conversation`] is the view model of one chat session: an ordered list
//! of [`ChatMessage`]s holding plaintext for display. It never holds
//! envelopes; stored history is decrypted on load by
//! [`Conversation::from_history`].

use serde::{Deserialize, Serialize};
use solace_core::{Environment, MessageCipher, SessionId};

use crate::display::display_text;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person using the chat.
    User,
    /// The support assistant.
    Assistant,
}

/// A message as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Server-assigned id, or a local id while delivery is pending.
    pub id: String,
    /// Author.
    pub role: Role,
    /// Plaintext for display.
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp_millis: u64,
}

impl ChatMessage {
    /// Create a message.
    pub fn new(
        id: impl Into<String>,
        role: Role,
        text: impl Into<String>,
        timestamp_millis: u64,
    ) -> Self {
        Self { id: id.into(), role, text: text.into(), timestamp_millis }
    }
}

/// Stored message as returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Server-assigned id.
    pub id: String,
    /// Author.
    pub role: Role,
    /// Envelope when `encrypted`, plaintext otherwise.
    pub content: String,
    /// Whether `content` is an envelope.
    #[serde(default)]
    pub encrypted: bool,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp_millis: u64,
}

/// Ordered messages of one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversation opened by an assistant greeting.
    pub fn with_welcome(text: impl Into<String>, timestamp_millis: u64) -> Self {
        let welcome = ChatMessage::new("welcome", Role::Assistant, text, timestamp_millis);
        Self { messages: vec![welcome] }
    }

    /// Rebuild a conversation from stored history.
    ///
    /// Entries that fail to decrypt are shown as
    /// [`CONTENT_UNAVAILABLE`](crate::notices::CONTENT_UNAVAILABLE) instead of
    /// failing the whole load.
    pub fn from_history<E: Environment>(
        entries: &[HistoryEntry],
        cipher: &MessageCipher<E>,
        session: &SessionId,
    ) -> Self {
        let messages = entries
            .iter()
            .map(|entry| {
                let text = display_text(&entry.content, entry.encrypted, cipher, session);
                ChatMessage::new(entry.id.clone(), entry.role, text, entry.timestamp_millis)
            })
            .collect();
        Self { messages }
    }

    /// Messages in display order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Remove the message with `id`, returning it.
    pub fn remove(&mut self, id: &str) -> Option<ChatMessage> {
        let index = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(index))
    }

    /// Give the message with id `from` the id `to`. Returns false if no
    /// message has id `from`.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> bool {
        match self.messages.iter_mut().find(|m| m.id == from) {
            Some(message) => {
                message.id = to.into();
                true
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_is_single_assistant_message() {
        let conversation = Conversation::with_welcome("chào", 7);

        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].role, Role::Assistant);
        assert_eq!(conversation.messages()[0].timestamp_millis, 7);
    }

    #[test]
    fn remove_only_targets_matching_id() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::new("a", Role::User, "one", 1));
        conversation.push(ChatMessage::new("b", Role::User, "two", 2));

        assert!(conversation.remove("missing").is_none());
        assert_eq!(conversation.remove("a").map(|m| m.text), Some("one".into()));
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0].id, "b");
    }

    #[test]
    fn rename_replaces_id() {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::new("local-1", Role::User, "hi", 1));

        assert!(conversation.rename("local-1", "srv-9"));
        assert!(!conversation.rename("local-1", "srv-10"));
        assert_eq!(conversation.messages()[0].id, "srv-9");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
