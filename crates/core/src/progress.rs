//! Completion figures derived from the schema and the current responses.
//!
//! Nothing here is cached: a snapshot is cheap to recompute on every render.

use serde::{Deserialize, Serialize};

use crate::model::{Responses, Schema, Section, SectionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl SectionStatus {
    #[must_use]
    pub fn classify(answered: usize, total: usize) -> Self {
        if answered == 0 {
            Self::NotStarted
        } else if answered >= total {
            Self::Completed
        } else {
            Self::InProgress
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionProgress {
    pub section_id: SectionId,
    pub answered: usize,
    pub total: usize,
    pub percentage: u32,
    pub status: SectionStatus,
}

impl SectionProgress {
    #[must_use]
    pub fn compute(section: &Section, responses: &Responses) -> Self {
        let answered = responses.answered_in(section);
        let total = section.questions().len();
        Self {
            section_id: section.id().clone(),
            answered,
            total,
            percentage: percentage(answered, total),
            status: SectionStatus::classify(answered, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub total_questions: usize,
    pub answered_questions: usize,
    pub percentage: u32,
    pub completed_sections: usize,
    pub total_sections: usize,
    pub sections: Vec<SectionProgress>,
}

impl ProgressSnapshot {
    /// Only answers to questions in the schema count; stray keys are ignored.
    #[must_use]
    pub fn compute(schema: &Schema, responses: &Responses) -> Self {
        let sections: Vec<SectionProgress> = schema
            .sections()
            .iter()
            .map(|section| SectionProgress::compute(section, responses))
            .collect();

        let total_questions = sections.iter().map(|s| s.total).sum();
        let answered_questions = sections.iter().map(|s| s.answered).sum();
        let completed_sections = sections
            .iter()
            .filter(|s| s.status == SectionStatus::Completed)
            .count();

        Self {
            total_questions,
            answered_questions,
            percentage: percentage(answered_questions, total_questions),
            completed_sections,
            total_sections: sections.len(),
            sections,
        }
    }

    /// Complete once the rounded percentage shows 100.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.percentage == 100
    }
}

/// `round(100 * part / whole)` with halves rounded up; `0` when `whole` is 0.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    let rounded = (part * 200 + whole) / (whole * 2);
    u32::try_from(rounded).unwrap_or(100)
}
