//! Crisis screens for failure-path tests.

use solace_core::{CrisisAssessment, CrisisScreen, ScreenError};

/// Screen that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingScreen;

impl CrisisScreen for FailingScreen {
    fn screen(&self, _text: &str) -> Result<CrisisAssessment, ScreenError> {
        Err(ScreenError::Unavailable { reason: "simulated screen outage".into() })
    }
}
