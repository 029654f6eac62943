//! Fuzz target for envelope parsing
//!
//! Feeds arbitrary text to `Envelope::decode` and `MessageCipher::decrypt`.
//!
//! # Invariants
//!
//! - Decoding never panics; bad base64 or short input is `MalformedEnvelope`
//! - Anything that decodes re-encodes to a string that decodes to the same
//!   envelope
//! - Random envelopes never authenticate

#![no_main]

use libfuzzer_sys::fuzz_target;
use solace_core::{CipherConfig, KdfParams, MessageCipher, SessionId, SystemEnv};
use solace_crypto::Envelope;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(envelope) = Envelope::decode(text) {
        let reencoded = envelope.encode();
        assert_eq!(Envelope::decode(&reencoded).ok(), Some(envelope));
    }

    let kdf = KdfParams::new(b"solace.fuzz".to_vec(), 1).unwrap();
    let cipher = MessageCipher::new(SystemEnv::new(), CipherConfig { kdf, ..Default::default() });
    let session = SessionId::new("sess-fuzz").unwrap();

    if let Err(error) = cipher.decrypt(text, &session) {
        assert!(error.is_decryption_failure(), "unexpected error class: {error}");
    }
});
