//! Fuzz target for envelope integrity
//!
//! Seals a fuzzer-chosen message, applies one structured mutation to the
//! envelope and decrypts the result.
//!
//! # Strategy
//!
//! - Flip: XOR one byte of the raw envelope
//! - Truncate: drop bytes from the end
//! - Extend: append bytes
//! - Swap session: decrypt under another session identifier
//!
//! # Invariants
//!
//! - An unmodified envelope always opens to the original text
//! - A modified envelope NEVER opens to any text
//! - No mutation panics

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use solace_core::{CipherConfig, CipherSuite, KdfParams, MessageCipher, SessionId, SystemEnv};
use solace_crypto::Envelope;

#[derive(Debug, Arbitrary)]
enum Mutation {
    None,
    Flip { index: usize, mask: u8 },
    Truncate { drop: usize },
    Extend { bytes: Vec<u8> },
    SwapSession { other: String },
}

#[derive(Debug, Arbitrary)]
struct Input {
    plaintext: String,
    chacha: bool,
    mutation: Mutation,
}

fuzz_target!(|input: Input| {
    let kdf = KdfParams::new(b"solace.fuzz".to_vec(), 1).unwrap();
    let suite = if input.chacha { CipherSuite::ChaCha20Poly1305 } else { CipherSuite::Aes256Gcm };
    let cipher = MessageCipher::new(SystemEnv::new(), CipherConfig { kdf, suite });
    let session = SessionId::new("sess-fuzz").unwrap();

    let sealed = cipher.encrypt(&input.plaintext, &session).unwrap();
    let mut raw = Envelope::decode(&sealed).unwrap().to_bytes();

    let (tampered, open_as) = match input.mutation {
        Mutation::None => {
            assert_eq!(cipher.decrypt(&sealed, &session).unwrap(), input.plaintext);
            return;
        },
        Mutation::Flip { index, mask } => {
            if mask == 0 {
                return;
            }
            let index = index % raw.len();
            raw[index] ^= mask;
            (raw, session)
        },
        Mutation::Truncate { drop } => {
            let drop = drop % raw.len() + 1;
            raw.truncate(raw.len() - drop);
            (raw, session)
        },
        Mutation::Extend { bytes } => {
            if bytes.is_empty() {
                return;
            }
            raw.extend_from_slice(&bytes);
            (raw, session)
        },
        Mutation::SwapSession { other } => {
            let Ok(other) = SessionId::new(other) else {
                return;
            };
            if other == session {
                return;
            }
            (raw, other)
        },
    };

    let encoded = match Envelope::from_bytes(&tampered) {
        Ok(envelope) => envelope.encode(),
        Err(_) => return,
    };
    assert!(cipher.decrypt(&encoded, &open_as).is_err(), "tampered envelope authenticated");
});
