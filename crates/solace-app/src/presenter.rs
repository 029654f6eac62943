//! Crisis interstitial port.

use serde::{Deserialize, Serialize};
use solace_core::{CrisisCategory, CrisisResources, Severity};

/// What raised a crisis alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum AlertTrigger {
    /// The local keyword screen matched the outgoing text.
    ClientKeyword {
        /// Highest matched severity.
        severity: Severity,
        /// Matched categories.
        categories: Vec<CrisisCategory>,
    },
    /// The local screen failed; the message was held back unchecked.
    ScreenFailure,
    /// The server flagged a delivered message.
    Server,
}

/// Payload of the crisis interstitial.
///
/// Carries no message content, only the trigger and static hotlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisAlert {
    /// What raised the alert.
    pub trigger: AlertTrigger,
    /// Hotlines to show.
    pub resources: CrisisResources,
}

/// UI collaborator that renders alerts and notices.
///
/// Calls are synchronous and must not block; the pipeline invokes them
/// without holding any lock.
pub trait CrisisPresenter: Send + Sync {
    /// Show the crisis interstitial.
    fn show_crisis(&self, alert: &CrisisAlert);

    /// Show a transient notice such as
    /// [`SEND_FAILED`](crate::notices::SEND_FAILED).
    fn show_error(&self, notice: &str);
}
