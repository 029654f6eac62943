//! Keyword-based crisis detector.

use unicode_normalization::UnicodeNormalization;

use super::{CrisisAssessment, CrisisScreen, KeywordSet, ScreenError, Severity};

/// Case-insensitive phrase matcher.
///
/// Both the text and the phrases are normalized: lower-cased, composed to
/// NFC, punctuation replaced by spaces and whitespace runs collapsed. A phrase matches when it
/// is a substring of the normalized text, so "Tự tử!!" matches "tự tử" and a
/// line break inside a phrase still matches.
///
/// The detector never logs or stores the text it screens.
#[derive(Debug, Clone, Default)]
pub struct CrisisDetector {
    keywords: KeywordSet,
}

impl CrisisDetector {
    /// Create a detector over `keywords`.
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    /// Configured phrases.
    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// True if `text` contains any configured phrase.
    pub fn detect(&self, text: &str) -> bool {
        let text = normalize(text);
        !text.is_empty() && self.keywords.iter().any(|k| text.contains(k.normalized()))
    }

    /// Matched categories, phrases and severity for `text`.
    pub fn assess(&self, text: &str) -> CrisisAssessment {
        let text = normalize(text);
        if text.is_empty() {
            return CrisisAssessment::clear();
        }

        let mut assessment = CrisisAssessment::clear();
        for keyword in self.keywords.iter().filter(|k| text.contains(k.normalized())) {
            let category = keyword.category();
            if !assessment.categories.contains(&category) {
                assessment.categories.push(category);
            }
            assessment.severity = assessment.severity.max(category.severity());
            assessment.matched.push(keyword.phrase().to_owned());
        }

        debug_assert!(assessment.is_crisis() || assessment.severity == Severity::None);
        assessment
    }
}

impl CrisisScreen for CrisisDetector {
    fn screen(&self, text: &str) -> Result<CrisisAssessment, ScreenError> {
        Ok(self.assess(text))
    }
}

/// Lower-case, compose to NFC, replace punctuation with spaces and collapse
/// whitespace.
///
/// Composition makes decomposed tone marks (`u` + U+031B + U+0323) equal to
/// the precomposed letter (`ự`). Combining marks left over after composition
/// (U+0300..=U+036F) are kept.
pub(super) fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase).nfc() {
        let keep = c.is_alphanumeric() || ('\u{0300}'..='\u{036F}').contains(&c);
        if keep {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}
