use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use intake_core::autosave::AutoSaveSnapshot;
use intake_core::model::{FormState, QuestionId, Responses, Schema};
use intake_core::progress::ProgressSnapshot;
use storage::repository::FormStateRepository;

use crate::Clock;
use crate::error::IntakeError;

/// Loads form state at startup and persists it on change.
#[derive(Clone)]
pub struct IntakeService {
    clock: Clock,
    schema: Arc<Schema>,
    form_state: Arc<dyn FormStateRepository>,
}

impl IntakeService {
    #[must_use]
    pub fn new(clock: Clock, schema: Arc<Schema>, form_state: Arc<dyn FormStateRepository>) -> Self {
        Self {
            clock,
            schema,
            form_state,
        }
    }

    #[must_use]
    pub fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Rebuild the form from the local store.
    ///
    /// When the responses key is missing the auto-save snapshot is used
    /// instead. A stale section index is clamped to the schema.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Storage` if the store cannot be read.
    pub async fn load(&self) -> Result<FormState, IntakeError> {
        let responses = match self.form_state.load_responses().await? {
            Some(responses) => responses,
            None => match self.form_state.load_autosave().await? {
                Some(snapshot) => {
                    debug!(saved_at = %snapshot.timestamp, "restoring responses from auto-save snapshot");
                    snapshot.data
                }
                None => Responses::new(),
            },
        };
        let index = self.form_state.load_current_section().await?.unwrap_or(0);
        let email = self.form_state.load_user_email().await?;

        let state = FormState::from_persisted(&self.schema, responses, index, email);
        info!(
            answered = state.responses().answered_count(),
            section = state.current_index(),
            "form state loaded"
        );
        Ok(state)
    }

    /// # Errors
    ///
    /// Returns `IntakeError::Storage` if the write fails.
    pub async fn persist_responses(&self, responses: &Responses) -> Result<(), IntakeError> {
        self.form_state.save_responses(responses).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `IntakeError::Storage` if the write fails.
    pub async fn save_current_section(&self, index: usize) -> Result<(), IntakeError> {
        self.form_state.save_current_section(index).await?;
        Ok(())
    }

    /// Store the email, or remove it when `None`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Storage` if the write fails.
    pub async fn save_user_email(&self, email: Option<&str>) -> Result<(), IntakeError> {
        self.form_state.save_user_email(email).await?;
        Ok(())
    }

    /// Write the responses key and the auto-save snapshot, returning the
    /// snapshot timestamp.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Storage` if either write fails.
    pub async fn save_snapshot(&self, responses: &Responses) -> Result<DateTime<Utc>, IntakeError> {
        let now = self.clock.now();
        self.form_state.save_responses(responses).await?;
        self.form_state
            .save_autosave(&AutoSaveSnapshot::new(responses.clone(), now))
            .await?;
        Ok(now)
    }

    /// Record one answer on `state` and persist the full map.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Form` for a question outside the schema and
    /// `IntakeError::Storage` if the write fails.
    pub async fn record_answer(
        &self,
        state: &mut FormState,
        question_id: &QuestionId,
        text: impl Into<String>,
    ) -> Result<(), IntakeError> {
        state.set_answer(&self.schema, question_id, text)?;
        self.persist_responses(state.responses()).await
    }

    #[must_use]
    pub fn progress(&self, responses: &Responses) -> ProgressSnapshot {
        ProgressSnapshot::compute(&self.schema, responses)
    }

    /// Remove every persisted key.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Storage` if the store cannot be cleared.
    pub async fn clear(&self) -> Result<(), IntakeError> {
        self.form_state.clear().await?;
        info!("form state cleared");
        Ok(())
    }
}
