//! Property-based tests for the session-bound message cipher
//!
//! Exercises [`MessageCipher`] through the production [`SystemEnv`]:
//! round-trip, session isolation, fresh nonces and tamper detection on the
//! base64 envelope.

use proptest::prelude::*;
use solace_core::{
    CipherConfig, CipherSuite, CryptoError, KdfParams, MessageCipher, SessionId, SystemEnv,
};

fn cipher(suite: CipherSuite) -> MessageCipher<SystemEnv> {
    let kdf = KdfParams::new(b"solace.test-salt".to_vec(), 16).unwrap();
    MessageCipher::new(SystemEnv::new(), CipherConfig { kdf, suite })
}

fn suite_strategy() -> impl Strategy<Value = CipherSuite> {
    prop_oneof![Just(CipherSuite::Aes256Gcm), Just(CipherSuite::ChaCha20Poly1305)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_roundtrip(
        plaintext in any::<String>(),
        session in "[a-zA-Z0-9-]{1,32}",
        suite in suite_strategy(),
    ) {
        let cipher = cipher(suite);
        let session = SessionId::new(session).unwrap();

        let envelope = cipher.encrypt(&plaintext, &session).unwrap();

        prop_assert_eq!(cipher.decrypt(&envelope, &session).unwrap(), plaintext);
    }

    #[test]
    fn prop_sessions_are_isolated(
        plaintext in ".{0,64}",
        session_a in "[a-z0-9]{1,16}",
        session_b in "[a-z0-9]{1,16}",
    ) {
        prop_assume!(session_a != session_b);
        let cipher = cipher(CipherSuite::Aes256Gcm);
        let a = SessionId::new(session_a).unwrap();
        let b = SessionId::new(session_b).unwrap();

        let envelope = cipher.encrypt(&plaintext, &a).unwrap();

        prop_assert_eq!(cipher.decrypt(&envelope, &b), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn prop_repeated_encryption_differs(plaintext in ".{0,64}") {
        let cipher = cipher(CipherSuite::Aes256Gcm);
        let session = SessionId::new("sess-abc123").unwrap();

        let first = cipher.encrypt(&plaintext, &session).unwrap();
        let second = cipher.encrypt(&plaintext, &session).unwrap();

        prop_assert_ne!(first, second);
    }

    #[test]
    fn prop_garbage_envelope_is_a_decryption_failure(envelope in any::<String>()) {
        let cipher = cipher(CipherSuite::Aes256Gcm);
        let session = SessionId::new("sess-abc123").unwrap();

        let err = cipher.decrypt(&envelope, &session).unwrap_err();

        prop_assert!(err.is_decryption_failure());
    }
}
