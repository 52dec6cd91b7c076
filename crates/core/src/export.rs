//! The exported JSON document and the export dialog's state machine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ExportFormat, QuestionId, Responses, Schema, SectionId};
use crate::progress::ProgressSnapshot;

pub const EXPORT_VERSION: &str = "1.0";
pub const EXPORT_SOURCE: &str = "Mindclone Data Intake";
const FILE_PREFIX: &str = "mindclone-responses";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportDocumentError {
    #[error("export document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub exported_at: DateTime<Utc>,
    pub version: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerExport {
    pub question_id: QuestionId,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionExport {
    pub id: SectionId,
    pub title: String,
    pub answers: Vec<AnswerExport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default)]
    pub total_responses: usize,
    #[serde(default)]
    pub completion_percentage: u32,
    #[serde(default)]
    pub responses: Responses,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<SectionExport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExportMetadata>,
}

impl ExportDocument {
    #[must_use]
    pub fn build(
        schema: &Schema,
        responses: &Responses,
        user_email: Option<&str>,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Self {
        let progress = ProgressSnapshot::compute(schema, responses);
        let sections = match format {
            ExportFormat::Raw => None,
            ExportFormat::WithQuestions => Some(join_with_questions(schema, responses)),
        };

        Self {
            timestamp: now,
            user_email: user_email.map(str::to_string),
            total_responses: responses.answered_count(),
            completion_percentage: progress.percentage,
            responses: responses.clone(),
            sections,
            metadata: Some(ExportMetadata {
                exported_at: now,
                version: EXPORT_VERSION.to_string(),
                source: EXPORT_SOURCE.to_string(),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns `ExportDocumentError::Json` if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, ExportDocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a previously exported document. Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ExportDocumentError::Json` for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, ExportDocumentError> {
        Ok(serde_json::from_str(raw)?)
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        export_file_name(self.timestamp.date_naive())
    }
}

/// `mindclone-responses-YYYY-MM-DD.json`
#[must_use]
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{FILE_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}

fn join_with_questions(schema: &Schema, responses: &Responses) -> Vec<SectionExport> {
    schema
        .sections()
        .iter()
        .map(|section| SectionExport {
            id: section.id().clone(),
            title: section.title().to_string(),
            answers: section
                .questions()
                .iter()
                .map(|q| AnswerExport {
                    question_id: q.id().clone(),
                    question: q.text().to_string(),
                    answer: responses.answer(q.id().as_str()).to_string(),
                })
                .collect(),
        })
        .collect()
}

/// Figures shown once an export has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReceipt {
    pub response_count: usize,
    pub completion_percentage: u32,
}

impl From<&ExportDocument> for ExportReceipt {
    fn from(doc: &ExportDocument) -> Self {
        Self {
            response_count: doc.total_responses,
            completion_percentage: doc.completion_percentage,
        }
    }
}

/// `Idle -> Exporting -> Done`, with failures returning to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFlow {
    #[default]
    Idle,
    Exporting,
    Done(ExportReceipt),
}

impl ExportFlow {
    /// Enter `Exporting`. Returns `false` if an export is already running.
    pub fn begin(&mut self) -> bool {
        if matches!(self, Self::Exporting) {
            return false;
        }
        *self = Self::Exporting;
        true
    }

    pub fn finish(&mut self, receipt: ExportReceipt) {
        *self = Self::Done(receipt);
    }

    pub fn fail(&mut self) {
        *self = Self::Idle;
    }

    #[must_use]
    pub fn is_exporting(&self) -> bool {
        matches!(self, Self::Exporting)
    }

    #[must_use]
    pub fn receipt(&self) -> Option<ExportReceipt> {
        match self {
            Self::Done(receipt) => Some(*receipt),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, SchemaMeta, Section};
    use crate::time::fixed_now;

    fn schema() -> Schema {
        Schema::new(
            SchemaMeta {
                title: "T".into(),
                description: String::new(),
                settings: Default::default(),
            },
            vec![
                Section::new(
                    "s1",
                    "Basics",
                    vec![
                        Question::new("q1", "Who are you?", None, None, None).unwrap(),
                        Question::new("q2", "What do you value?", None, None, None).unwrap(),
                    ],
                ),
                Section::new(
                    "s2",
                    "Stories",
                    vec![Question::new("q3", "Tell a story", None, None, None).unwrap()],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn empty_responses_export_cleanly() {
        let doc = ExportDocument::build(
            &schema(),
            &Responses::new(),
            None,
            ExportFormat::Raw,
            fixed_now(),
        );
        assert_eq!(doc.completion_percentage, 0);
        assert_eq!(doc.total_responses, 0);

        let json = doc.to_pretty_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["responses"].as_object().unwrap().is_empty());
        assert!(value.get("userEmail").is_none());
        assert!(value.get("sections").is_none());
        assert_eq!(value["metadata"]["version"], "1.0");
        assert_eq!(value["metadata"]["source"], "Mindclone Data Intake");
    }

    #[test]
    fn reimport_reproduces_responses() {
        let mut responses = Responses::new();
        responses.set(QuestionId::new("q1"), "A builder.\nMostly.");
        responses.set(QuestionId::new("q2"), "   ");
        responses.set(QuestionId::new("legacy"), "kept as-is");

        let doc = ExportDocument::build(
            &schema(),
            &responses,
            Some("me@example.com"),
            ExportFormat::WithQuestions,
            fixed_now(),
        );
        let json = doc.to_pretty_json().unwrap();
        let back = ExportDocument::from_json(&json).unwrap();

        assert_eq!(back.responses, responses);
        assert_eq!(back, doc);
    }

    #[test]
    fn with_questions_joins_question_text() {
        let mut responses = Responses::new();
        responses.set(QuestionId::new("q3"), "Once upon a time");
        let doc = ExportDocument::build(
            &schema(),
            &responses,
            None,
            ExportFormat::WithQuestions,
            fixed_now(),
        );
        let sections = doc.sections.as_ref().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].answers[0].question, "Who are you?");
        assert_eq!(sections[0].answers[0].answer, "");
        assert_eq!(sections[1].answers[0].answer, "Once upon a time");
        assert_eq!(doc.completion_percentage, 33);
        assert_eq!(doc.total_responses, 1);
    }

    #[test]
    fn import_ignores_foreign_fields() {
        let raw = r#"{
            "timestamp": "2024-01-02T03:04:05Z",
            "userEmail": "x@y.z",
            "responses": { "q1": "hi" },
            "somethingElse": 42
        }"#;
        let doc = ExportDocument::from_json(raw).unwrap();
        assert_eq!(doc.responses.answer("q1"), "hi");
        assert_eq!(doc.metadata, None);
    }

    #[test]
    fn file_name_uses_export_date() {
        let doc = ExportDocument::build(
            &schema(),
            &Responses::new(),
            None,
            ExportFormat::Raw,
            fixed_now(),
        );
        assert_eq!(doc.file_name(), "mindclone-responses-2023-11-14.json");
    }

    #[test]
    fn flow_refuses_overlapping_exports() {
        let mut flow = ExportFlow::default();
        assert!(flow.begin());
        assert!(!flow.begin());
        flow.fail();
        assert_eq!(flow, ExportFlow::Idle);
        assert!(flow.begin());
        flow.finish(ExportReceipt {
            response_count: 2,
            completion_percentage: 67,
        });
        assert_eq!(flow.receipt().unwrap().response_count, 2);
        assert!(!flow.is_exporting());
    }
}
