//! Solace operator tool.
//!
//! Seals and opens session envelopes, runs the crisis screen on text and
//! prints the emergency hotlines. Output goes to the supplied writer; logs go
//! to stderr through the subscriber installed by the binary.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

use std::io::{self, Read, Write};

use clap::{Parser, Subcommand, ValueEnum};
use solace_core::{
    CipherConfig, CipherSuite, CrisisDetector, CrisisResources, CryptoError, EmergencyContact,
    KdfParams, MessageCipher, SessionError, SessionId, SystemEnv,
};
use solace_crypto::{DEFAULT_ITERATIONS, DEFAULT_SALT};
use thiserror::Error;

/// Solace envelope and crisis-screen tool
#[derive(Parser, Debug)]
#[command(name = "solace")]
#[command(about = "Seal and open Solace message envelopes, screen text for crisis phrases")]
#[command(version)]
pub struct Cli {
    /// PBKDF2 salt shared by every session [default: built-in application salt]
    #[arg(long, env = "SOLACE_KDF_SALT", global = true)]
    pub salt: Option<String>,

    /// PBKDF2 iteration count
    #[arg(
        long,
        env = "SOLACE_KDF_ITERATIONS",
        default_value_t = DEFAULT_ITERATIONS,
        global = true
    )]
    pub iterations: u32,

    /// AEAD used for envelopes
    #[arg(
        long,
        env = "SOLACE_CIPHER_SUITE",
        value_enum,
        default_value_t = SuiteArg::Aes256Gcm,
        global = true
    )]
    pub suite: SuiteArg,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SOLACE_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encrypt text into a base64 envelope
    Encrypt {
        /// Session identifier the key is derived from
        #[arg(short, long, env = "SOLACE_SESSION")]
        session: String,
        /// Text to encrypt; read from stdin when omitted
        text: Option<String>,
    },
    /// Decrypt a base64 envelope
    Decrypt {
        /// Session identifier the key is derived from
        #[arg(short, long, env = "SOLACE_SESSION")]
        session: String,
        /// Envelope to decrypt; read from stdin when omitted
        envelope: Option<String>,
    },
    /// Screen text for crisis phrases; exits with status 2 on a match
    Check {
        /// Print the full assessment as JSON
        #[arg(long)]
        json: bool,
        /// Text to screen; read from stdin when omitted
        text: Option<String>,
    },
    /// Print emergency hotlines
    Resources {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// AEAD choice on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteArg {
    /// AES-256-GCM
    #[value(name = "aes-256-gcm")]
    Aes256Gcm,
    /// ChaCha20-Poly1305
    #[value(name = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl From<SuiteArg> for CipherSuite {
    fn from(arg: SuiteArg) -> Self {
        match arg {
            SuiteArg::Aes256Gcm => Self::Aes256Gcm,
            SuiteArg::ChaCha20Poly1305 => Self::ChaCha20Poly1305,
        }
    }
}

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing to report.
    Success,
    /// `check` matched a crisis phrase.
    CrisisDetected,
}

/// Command failures.
#[derive(Error, Debug)]
pub enum CliError {
    /// The session identifier was rejected.
    #[error("invalid session: {0}")]
    Session(#[from] SessionError),

    /// Key derivation, encryption or decryption failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON output could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Cli {
    /// Cipher parameters from the global options.
    ///
    /// # Errors
    ///
    /// - `Crypto`: empty salt or zero iterations
    pub fn cipher_config(&self) -> Result<CipherConfig, CliError> {
        let salt = self.salt.as_deref().map_or(DEFAULT_SALT, str::as_bytes);
        let kdf = KdfParams::new(salt, self.iterations)?;
        Ok(CipherConfig { kdf, suite: self.suite.into() })
    }
}

/// Run `cli`, reading missing positional input from `input` and writing
/// results to `out`.
pub fn run<R: Read, W: Write>(cli: &Cli, input: &mut R, out: &mut W) -> Result<Status, CliError> {
    match &cli.command {
        Command::Encrypt { session, text } => {
            let session = SessionId::new(session.as_str())?;
            let text = text_or_input(text.as_deref(), input)?;
            let cipher = MessageCipher::new(SystemEnv::new(), cli.cipher_config()?);
            writeln!(out, "{}", cipher.encrypt(&text, &session)?)?;
        },
        Command::Decrypt { session, envelope } => {
            let session = SessionId::new(session.as_str())?;
            let envelope = text_or_input(envelope.as_deref(), input)?;
            let cipher = MessageCipher::new(SystemEnv::new(), cli.cipher_config()?);
            writeln!(out, "{}", cipher.decrypt(envelope.trim(), &session)?)?;
        },
        Command::Check { json, text } => {
            let text = text_or_input(text.as_deref(), input)?;
            let assessment = CrisisDetector::default().assess(&text);
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&assessment)?)?;
            } else if assessment.is_crisis() {
                let matched = assessment.matched.join(", ");
                writeln!(out, "crisis ({:?}): {matched}", assessment.severity)?;
            } else {
                writeln!(out, "clear")?;
            }
            tracing::info!(crisis = assessment.is_crisis(), "screened input");
            if assessment.is_crisis() {
                return Ok(Status::CrisisDetected);
            }
        },
        Command::Resources { json } => {
            let resources = CrisisResources::vietnam();
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&resources)?)?;
            } else {
                writeln!(out, "{}", resources.warning)?;
                for contact in resources.contacts() {
                    let EmergencyContact { number, name, description, .. } = contact;
                    writeln!(out, "{number:<14} {name} ({description})")?;
                }
            }
        },
    }
    Ok(Status::Success)
}

fn text_or_input<R: Read>(text: Option<&str>, input: &mut R) -> io::Result<String> {
    match text {
        Some(text) => Ok(text.to_owned()),
        None => {
            let mut buffer = String::new();
            input.read_to_string(&mut buffer)?;
            // Drop the newline a shell pipe appends
            let trimmed = buffer.trim_end_matches(['\r', '\n']).len();
            buffer.truncate(trimmed);
            Ok(buffer)
        },
    }
}
