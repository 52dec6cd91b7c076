use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{QuestionId, Section};

/// Lower bound of the recommended answer length, in words.
pub const RECOMMENDED_MIN_WORDS: usize = 30;
/// Upper bound of the recommended answer length, in words.
pub const RECOMMENDED_MAX_WORDS: usize = 100;

/// Answers keyed by question id.
///
/// A missing entry and a whitespace-only entry both mean "unanswered".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Responses(BTreeMap<QuestionId, String>);

impl Responses {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored answer, or `""` when the question has none.
    #[must_use]
    pub fn answer(&self, id: &str) -> &str {
        self.0.get(id).map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_answered(&self, id: &str) -> bool {
        !self.answer(id).trim().is_empty()
    }

    /// Store the raw text exactly as typed. Returns the previous value.
    pub fn set(&mut self, id: QuestionId, text: impl Into<String>) -> Option<String> {
        self.0.insert(id, text.into())
    }

    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.0.remove(id)
    }

    /// Number of stored entries, blank ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries with non-blank text, regardless of schema membership.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.0.values().filter(|text| !text.trim().is_empty()).count()
    }

    #[must_use]
    pub fn answered_in(&self, section: &Section) -> usize {
        section
            .questions()
            .iter()
            .filter(|q| self.is_answered(q.id().as_str()))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &str)> {
        self.0.iter().map(|(id, text)| (id, text.as_str()))
    }
}

impl FromIterator<(QuestionId, String)> for Responses {
    fn from_iter<I: IntoIterator<Item = (QuestionId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Whitespace-separated word count of an answer.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Where an answer's length falls relative to the recommended range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCountBand {
    Short,
    Recommended,
    Long,
}

impl WordCountBand {
    #[must_use]
    pub fn classify(words: usize) -> Self {
        if words < RECOMMENDED_MIN_WORDS {
            Self::Short
        } else if words > RECOMMENDED_MAX_WORDS {
            Self::Long
        } else {
            Self::Recommended
        }
    }
}
