//! Crisis phrase lists.

use super::{CrisisCategory, detector::normalize};

const SUICIDE: &[&str] = &[
    "tự tử",
    "tự sát",
    "kết thúc cuộc đời",
    "muốn chết",
    "không muốn sống",
    "không muốn sống nữa",
    "biến mất",
    "chấm dứt",
];

const SELF_HARM: &[&str] = &[
    "cắt tay",
    "tự làm đau",
    "làm hại bản thân",
    "tự hành xác",
    "tự hành hạ",
    "đâm bản thân",
];

const DESPAIR: &[&str] =
    &["tuyệt vọng", "vô vọng", "cuộc sống vô nghĩa", "không còn hy vọng", "khủng hoảng"];

const SEXUAL_ABUSE: &[&str] = &[
    "quấy rối tình dục",
    "hiếp dâm",
    "cưỡng bức",
    "lạm dụng tình dục",
    "xâm hại tình dục",
    "bị cưỡng hiếp",
    "bị sờ mó",
    "bị xâm hại",
    "bị lạm dụng",
];

const VIOLENCE: &[&str] = &[
    "bị đánh đập",
    "bạo lực gia đình",
    "xâm hại",
    "bạo lực học đường",
    "đánh chết",
    "chém",
    "giết",
    "hành hạ",
    "tra tấn",
];

/// One configured phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    category: CrisisCategory,
    phrase: String,
    normalized: String,
}

impl Keyword {
    /// Category the phrase belongs to.
    pub fn category(&self) -> CrisisCategory {
        self.category
    }

    /// Phrase as configured.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub(super) fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Ordered list of crisis phrases.
///
/// Phrases are normalized once at construction. A phrase that normalizes to
/// nothing (only punctuation or whitespace) is dropped, since it would match
/// every message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// Build a set from `(category, phrase)` pairs.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CrisisCategory, S)>,
        S: Into<String>,
    {
        let keywords = entries
            .into_iter()
            .filter_map(|(category, phrase)| {
                let phrase = phrase.into();
                let normalized = normalize(&phrase);
                (!normalized.is_empty()).then_some(Keyword { category, phrase, normalized })
            })
            .collect();
        Self { keywords }
    }

    /// Default Vietnamese phrase list.
    pub fn vietnamese() -> Self {
        let groups = [
            (CrisisCategory::Suicide, SUICIDE),
            (CrisisCategory::SelfHarm, SELF_HARM),
            (CrisisCategory::Despair, DESPAIR),
            (CrisisCategory::SexualAbuse, SEXUAL_ABUSE),
            (CrisisCategory::Violence, VIOLENCE),
        ];
        Self::new(
            groups
                .into_iter()
                .flat_map(|(category, phrases)| phrases.iter().map(move |p| (category, *p))),
        )
    }

    /// Configured phrases in order.
    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    /// Number of phrases.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// True when no phrase is configured.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::vietnamese()
    }
}
