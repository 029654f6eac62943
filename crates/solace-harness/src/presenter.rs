//! Recording presenter.

use std::sync::{Arc, Mutex, PoisonError};

use solace_app::{CrisisAlert, CrisisPresenter};

/// One presenter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    /// `show_crisis` was called.
    Crisis(CrisisAlert),
    /// `show_error` was called with this notice.
    Error(String),
}

/// Presenter that records calls instead of rendering.
///
/// Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<PresenterEvent>>>,
}

impl RecordingPresenter {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order.
    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Crisis alerts shown.
    pub fn alerts(&self) -> Vec<CrisisAlert> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::Crisis(alert) => Some(alert),
                PresenterEvent::Error(_) => None,
            })
            .collect()
    }

    /// Notices shown.
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::Error(notice) => Some(notice),
                PresenterEvent::Crisis(_) => None,
            })
            .collect()
    }

    fn record(&self, event: PresenterEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

impl CrisisPresenter for RecordingPresenter {
    fn show_crisis(&self, alert: &CrisisAlert) {
        self.record(PresenterEvent::Crisis(alert.clone()));
    }

    fn show_error(&self, notice: &str) {
        self.record(PresenterEvent::Error(notice.to_owned()));
    }
}
