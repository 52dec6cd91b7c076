use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{QuestionId, SectionId};

const BUILTIN_SCHEMA: &str = include_str!("../../data/questions.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("section id cannot be empty")]
    EmptySectionId,

    #[error("duplicate section id: {0}")]
    DuplicateSection(SectionId),

    #[error("question id cannot be empty (section {0})")]
    EmptyQuestionId(SectionId),

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),

    #[error("question {0} has no text")]
    EmptyQuestionText(QuestionId),
}

/// Feature flags carried in the schema metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct FormSettings {
    pub show_progress_bar: bool,
    pub allow_save_and_resume: bool,
    pub collect_email: bool,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            show_progress_bar: true,
            allow_save_and_resume: true,
            collect_email: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMeta {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: FormSettings,
}

/// A single free-text question. Optional texts are `None` rather than empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    hint: Option<String>,
    example_good: Option<String>,
    example_bad: Option<String>,
}

impl Question {
    /// # Errors
    ///
    /// Returns `SchemaError` if the id or text is blank.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        hint: Option<String>,
        example_good: Option<String>,
        example_bad: Option<String>,
    ) -> Result<Self, SchemaError> {
        let id = QuestionId::new(id.into().trim());
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(SchemaError::EmptyQuestionText(id));
        }
        Ok(Self {
            id,
            text,
            hint: normalize_optional(hint),
            example_good: normalize_optional(example_good),
            example_bad: normalize_optional(example_bad),
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn example_good(&self) -> Option<&str> {
        self.example_good.as_deref()
    }

    #[must_use]
    pub fn example_bad(&self) -> Option<&str> {
        self.example_bad.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    title: String,
    questions: Vec<Question>,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: SectionId::new(id.into().trim()),
            title: title.into(),
            questions,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

/// The immutable questionnaire: metadata plus ordered sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    meta: SchemaMeta,
    sections: Vec<Section>,
}

impl Schema {
    /// Assemble a schema, checking id uniqueness across sections and questions.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` for blank or duplicate ids.
    pub fn new(meta: SchemaMeta, sections: Vec<Section>) -> Result<Self, SchemaError> {
        let mut section_ids = HashSet::new();
        let mut question_ids = HashSet::new();
        for section in &sections {
            if section.id.as_str().is_empty() {
                return Err(SchemaError::EmptySectionId);
            }
            if !section_ids.insert(section.id.clone()) {
                return Err(SchemaError::DuplicateSection(section.id.clone()));
            }
            for question in &section.questions {
                if question.id.as_str().is_empty() {
                    return Err(SchemaError::EmptyQuestionId(section.id.clone()));
                }
                if !question_ids.insert(question.id.clone()) {
                    return Err(SchemaError::DuplicateQuestion(question.id.clone()));
                }
            }
        }
        Ok(Self { meta, sections })
    }

    /// Parse the questions JSON document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Parse` for malformed JSON and validation errors otherwise.
    pub fn from_json(raw: &str) -> Result<Self, SchemaError> {
        let doc: RawSchema = serde_json::from_str(raw)?;
        let sections = doc
            .sections
            .into_iter()
            .map(|section| {
                let questions = section
                    .questions
                    .into_iter()
                    .map(|q| Question::new(q.id, q.text, q.hint, q.example_good, q.example_bad))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Section::new(section.id, section.title, questions))
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Self::new(doc.meta, sections)
    }

    /// The questionnaire shipped with the application.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the embedded document is invalid.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_json(BUILTIN_SCHEMA)
    }

    #[must_use]
    pub fn meta(&self) -> &SchemaMeta {
        &self.meta
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions.iter())
    }

    #[must_use]
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id.as_str() == id)
    }

    #[must_use]
    pub fn contains_question(&self, id: &str) -> bool {
        self.question(id).is_some()
    }
}

#[derive(Deserialize)]
struct RawSchema {
    meta: SchemaMeta,
    #[serde(default)]
    sections: Vec<RawSection>,
}

#[derive(Deserialize)]
struct RawSection {
    id: String,
    title: String,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Deserialize)]
struct RawQuestion {
    id: String,
    text: String,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    example_good: Option<String>,
    #[serde(default)]
    example_bad: Option<String>,
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
