use thiserror::Error;

use crate::model::{QuestionId, Responses, Schema, Section};
use crate::navigator::SectionCursor;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormError {
    #[error("question {0} is not part of the schema")]
    UnknownQuestion(QuestionId),
}

/// In-progress answers for one intake session, together with where the user
/// is in the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    responses: Responses,
    cursor: SectionCursor,
    user_email: Option<String>,
}

impl FormState {
    #[must_use]
    pub fn new(schema: &Schema) -> Self {
        Self {
            responses: Responses::new(),
            cursor: SectionCursor::new(schema.section_count()),
            user_email: None,
        }
    }

    /// Rehydrate from persisted values. A stale section index is clamped.
    #[must_use]
    pub fn from_persisted(
        schema: &Schema,
        responses: Responses,
        section_index: usize,
        user_email: Option<String>,
    ) -> Self {
        let mut cursor = SectionCursor::new(schema.section_count());
        cursor.jump(section_index);
        Self {
            responses,
            cursor,
            user_email: normalize_email(user_email),
        }
    }

    #[must_use]
    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    #[must_use]
    pub fn cursor(&self) -> SectionCursor {
        self.cursor
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    #[must_use]
    pub fn current_section<'a>(&self, schema: &'a Schema) -> Option<&'a Section> {
        schema.section(self.cursor.index())
    }

    #[must_use]
    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    /// Record an answer for a question that belongs to the schema.
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnknownQuestion` if the id is not in the schema.
    pub fn set_answer(
        &mut self,
        schema: &Schema,
        id: &QuestionId,
        text: impl Into<String>,
    ) -> Result<(), FormError> {
        if !schema.contains_question(id.as_str()) {
            return Err(FormError::UnknownQuestion(id.clone()));
        }
        self.responses.set(id.clone(), text);
        Ok(())
    }

    /// Replace all answers, e.g. after importing an exported file.
    pub fn replace_responses(&mut self, responses: Responses) {
        self.responses = responses;
    }

    pub fn set_user_email(&mut self, email: Option<String>) {
        self.user_email = normalize_email(email);
    }

    /// Returns the clamped index actually selected.
    pub fn jump_to(&mut self, index: usize) -> usize {
        self.cursor.jump(index)
    }

    pub fn next_section(&mut self) -> usize {
        self.cursor.next()
    }

    pub fn previous_section(&mut self) -> usize {
        self.cursor.previous()
    }
}

fn normalize_email(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, SchemaMeta};

    fn schema() -> Schema {
        let q = |id: &str| Question::new(id, format!("{id}?"), None, None, None).unwrap();
        Schema::new(
            SchemaMeta {
                title: "T".into(),
                description: String::new(),
                settings: Default::default(),
            },
            vec![
                Section::new("s1", "One", vec![q("a"), q("b")]),
                Section::new("s2", "Two", vec![q("c")]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_answers_for_unknown_questions() {
        let schema = schema();
        let mut state = FormState::new(&schema);
        let err = state
            .set_answer(&schema, &QuestionId::new("zzz"), "hi")
            .unwrap_err();
        assert_eq!(err, FormError::UnknownQuestion(QuestionId::new("zzz")));
        assert!(state.responses().is_empty());
    }

    #[test]
    fn clamps_persisted_section_index() {
        let schema = schema();
        let state = FormState::from_persisted(&schema, Responses::new(), 9, Some("  ".into()));
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.current_section(&schema).unwrap().title(), "Two");
        assert_eq!(state.user_email(), None);
    }

    #[test]
    fn trims_user_email() {
        let schema = schema();
        let mut state = FormState::new(&schema);
        state.set_user_email(Some(" me@example.com ".into()));
        assert_eq!(state.user_email(), Some("me@example.com"));
    }
}
