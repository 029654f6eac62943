//! Deterministic test harness for the Solace send pipeline.
//!
//! Seeded and scripted implementations of the pipeline's collaborators, so
//! tests can drive every state transition and observe every side effect:
//!
//! - [`SimEnv`]: seeded RNG and virtual clock, with a switch to simulate
//!   missing entropy
//! - [`ScriptedTransport`]: queued replies or failures, recorded requests,
//!   and an optional gate that holds delivery until the test releases it
//! - [`RecordingPresenter`]: records every alert and notice
//! - [`FailingScreen`]: crisis screen that never produces a verdict

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod presenter;
pub mod screen;
pub mod sim_env;
pub mod transport;

pub use presenter::{PresenterEvent, RecordingPresenter};
pub use screen::FailingScreen;
pub use sim_env::SimEnv;
pub use transport::ScriptedTransport;
