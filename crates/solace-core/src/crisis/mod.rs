//! Client-side crisis screening.
//!
//! Every outgoing message passes through a [`CrisisScreen`] before it reaches
//! the cipher. The default screen is [`CrisisDetector`], a keyword matcher over
//! a static phrase list ([`KeywordSet::vietnamese`]).
//!
//! # Limitations
//!
//! Keyword matching is a best-effort heuristic. It misses paraphrases,
//! misspellings and text written without diacritics, and it matches phrases
//! inside unrelated words. Server-side detection is authoritative; the client
//! check only decides whether a message is held back locally.

mod detector;
mod keywords;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use detector::CrisisDetector;
pub use keywords::{Keyword, KeywordSet};

/// Confidence added per matched phrase.
const CONFIDENCE_PER_MATCH: f32 = 0.3;

/// Kind of distress a phrase indicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisCategory {
    /// Suicidal ideation.
    Suicide,
    /// Self-harm.
    SelfHarm,
    /// Hopelessness and despair.
    Despair,
    /// Sexual abuse or harassment.
    SexualAbuse,
    /// Physical or domestic violence.
    Violence,
}

impl CrisisCategory {
    /// Severity attached to a match in this category.
    pub fn severity(self) -> Severity {
        match self {
            Self::Suicide | Self::SexualAbuse => Severity::Critical,
            Self::SelfHarm | Self::Violence => Severity::High,
            Self::Despair => Severity::Medium,
        }
    }
}

/// Ordered severity of an assessment.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Nothing matched.
    #[default]
    None,
    /// Worrying but not immediately dangerous.
    Medium,
    /// Risk of harm.
    High,
    /// Immediate danger to life or safety.
    Critical,
}

/// Result of screening one message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrisisAssessment {
    /// Matched categories, deduplicated, in keyword-list order.
    pub categories: Vec<CrisisCategory>,
    /// Matched phrases as configured.
    pub matched: Vec<String>,
    /// Highest severity among matched categories.
    pub severity: Severity,
}

impl CrisisAssessment {
    /// Assessment with no matches.
    pub fn clear() -> Self {
        Self::default()
    }

    /// True when at least one phrase matched.
    pub fn is_crisis(&self) -> bool {
        !self.matched.is_empty()
    }

    /// Heuristic confidence in `[0.0, 1.0]`, growing with the number of
    /// matched phrases.
    pub fn confidence(&self) -> f32 {
        (CONFIDENCE_PER_MATCH * self.matched.len() as f32).min(1.0)
    }
}

/// Errors from a crisis screen.
///
/// The keyword detector never fails; the variant exists for screens backed by
/// a model or remote service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// The screen could not produce a verdict.
    #[error("crisis screen unavailable: {reason}")]
    Unavailable {
        /// Failure description, never containing message text.
        reason: String,
    },
}

/// Decides whether outgoing text indicates a crisis.
///
/// Callers treat an error as a crisis: a message that could not be screened
/// is never sent.
pub trait CrisisScreen: Send + Sync {
    /// Screen `text`.
    ///
    /// # Errors
    ///
    /// - `Unavailable`: no verdict could be produced
    fn screen(&self, text: &str) -> Result<CrisisAssessment, ScreenError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::None < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn every_non_clear_severity_comes_from_a_category() {
        let categories = [
            CrisisCategory::Suicide,
            CrisisCategory::SelfHarm,
            CrisisCategory::Despair,
            CrisisCategory::SexualAbuse,
            CrisisCategory::Violence,
        ];
        for severity in [Severity::Medium, Severity::High, Severity::Critical] {
            assert!(categories.iter().any(|c| c.severity() == severity), "{severity:?}");
        }
        assert!(serde_json::from_str::<Severity>(r#""low""#).is_err());
    }

    #[test]
    fn category_severities() {
        assert_eq!(CrisisCategory::Suicide.severity(), Severity::Critical);
        assert_eq!(CrisisCategory::SexualAbuse.severity(), Severity::Critical);
        assert_eq!(CrisisCategory::SelfHarm.severity(), Severity::High);
        assert_eq!(CrisisCategory::Violence.severity(), Severity::High);
        assert_eq!(CrisisCategory::Despair.severity(), Severity::Medium);
    }

    #[test]
    fn confidence_grows_and_saturates() {
        let mut assessment = CrisisAssessment::clear();
        assert!(!assessment.is_crisis());
        assert!(assessment.confidence().abs() < f32::EPSILON);

        assessment.matched.push("tự tử".into());
        assert!((assessment.confidence() - 0.3).abs() < 1e-6);

        assessment.matched.extend(["a", "b", "c"].map(String::from));
        assert!((assessment.confidence() - 1.0).abs() < f32::EPSILON);
    }
}
