//! Rendering stored message content.

use solace_core::{Environment, MessageCipher, SessionId};

use crate::notices::CONTENT_UNAVAILABLE;

/// Plaintext to display for stored `content`.
///
/// Envelopes are decrypted with the session key. A failure is logged without
/// content and replaced by [`CONTENT_UNAVAILABLE`], so one corrupted or
/// foreign entry never breaks the conversation view.
pub fn display_text<E: Environment>(
    content: &str,
    encrypted: bool,
    cipher: &MessageCipher<E>,
    session: &SessionId,
) -> String {
    if !encrypted {
        return content.to_owned();
    }

    match cipher.decrypt(content, session) {
        Ok(plaintext) => plaintext,
        Err(error) => {
            tracing::warn!(session = session.short(), %error, "stored message unreadable");
            CONTENT_UNAVAILABLE.to_owned()
        },
    }
}

#[cfg(test)]
mod tests {
    use solace_core::{CipherConfig, KdfParams, SystemEnv};

    use super::*;

    fn cipher() -> MessageCipher<SystemEnv> {
        let kdf = KdfParams::new(b"solace.test-salt".to_vec(), 4).unwrap();
        MessageCipher::new(SystemEnv::new(), CipherConfig { kdf, ..CipherConfig::default() })
    }

    #[test]
    fn plaintext_passes_through() {
        let session = SessionId::new("sess-abc123").unwrap();

        assert_eq!(display_text("xin chào", false, &cipher(), &session), "xin chào");
    }

    #[test]
    fn envelope_is_decrypted() {
        let cipher = cipher();
        let session = SessionId::new("sess-abc123").unwrap();
        let envelope = cipher.encrypt("Mình hiểu", &session).unwrap();

        assert_eq!(display_text(&envelope, true, &cipher, &session), "Mình hiểu");
    }

    #[test]
    fn foreign_envelope_shows_placeholder() {
        let cipher = cipher();
        let envelope = cipher.encrypt("bí mật", &SessionId::new("sess-one").unwrap()).unwrap();
        let other = SessionId::new("sess-two").unwrap();

        assert_eq!(display_text(&envelope, true, &cipher, &other), CONTENT_UNAVAILABLE);
        assert_eq!(display_text("not base64!", true, &cipher, &other), CONTENT_UNAVAILABLE);
    }
}
