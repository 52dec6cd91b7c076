use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use intake_core::export::{ExportDocument, ExportFlow, ExportReceipt};
use intake_core::model::{ExportFormat, FormState, Responses};
use intake_core::progress::ProgressSnapshot;
use intake_core::wire::SaveProgressRequest;

use crate::error::{ExportError, SyncError};
use crate::intake_service::IntakeService;
use crate::sync::ProgressSync;

/// Result of a completed export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub receipt: ExportReceipt,
}

/// Finalizes the form, writes the JSON document, and restores from it.
pub struct ExportService {
    intake: Arc<IntakeService>,
    sync: Arc<dyn ProgressSync>,
    export_dir: PathBuf,
    format: ExportFormat,
    flow: Mutex<ExportFlow>,
}

impl ExportService {
    #[must_use]
    pub fn new(
        intake: Arc<IntakeService>,
        sync: Arc<dyn ProgressSync>,
        export_dir: PathBuf,
        format: ExportFormat,
    ) -> Self {
        Self {
            intake,
            sync,
            export_dir,
            format,
            flow: Mutex::new(ExportFlow::Idle),
        }
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    #[must_use]
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    #[must_use]
    pub fn flow(&self) -> ExportFlow {
        self.flow.lock().map(|flow| *flow).unwrap_or_default()
    }

    /// Back to `Idle`, e.g. when the dialog is dismissed.
    pub fn reset(&self) {
        if let Ok(mut flow) = self.flow.lock() {
            *flow = ExportFlow::Idle;
        }
    }

    /// Persist the answers and report the figures shown in the export dialog.
    ///
    /// The `save-progress` call is best-effort.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Intake` if the local store rejects the write.
    pub async fn finalize(&self, state: &FormState) -> Result<ExportReceipt, ExportError> {
        let responses = state.responses();
        self.intake.persist_responses(responses).await?;

        let request = SaveProgressRequest {
            responses: Some(responses.clone()),
            user_email: state.user_email().map(str::to_string),
            is_auto_save: false,
        };
        match self.sync.save_progress(&request).await {
            Ok(reply) => debug!(message = %reply.message, "final progress synced"),
            Err(SyncError::Disabled) => {}
            Err(err) => warn!(error = %err, "final progress sync failed"),
        }

        let progress = ProgressSnapshot::compute(&self.intake.schema(), responses);
        Ok(ExportReceipt {
            response_count: responses.answered_count(),
            completion_percentage: progress.percentage,
        })
    }

    /// Write `mindclone-responses-YYYY-MM-DD.json` to the export directory.
    ///
    /// The document is also handed to the `export-data` sink on a detached
    /// task; that call never affects the result.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Busy` while another export runs, and the
    /// document, write or store error otherwise. Any error resets the flow
    /// to `Idle`.
    pub async fn export(&self, state: &FormState) -> Result<ExportOutcome, ExportError> {
        {
            let mut flow = self.flow.lock().map_err(|_| ExportError::Busy)?;
            if !flow.begin() {
                return Err(ExportError::Busy);
            }
        }

        match self.write_document(state).await {
            Ok(outcome) => {
                if let Ok(mut flow) = self.flow.lock() {
                    flow.finish(outcome.receipt);
                }
                Ok(outcome)
            }
            Err(err) => {
                if let Ok(mut flow) = self.flow.lock() {
                    flow.fail();
                }
                Err(err)
            }
        }
    }

    async fn write_document(&self, state: &FormState) -> Result<ExportOutcome, ExportError> {
        let schema = self.intake.schema();
        let document = ExportDocument::build(
            &schema,
            state.responses(),
            state.user_email(),
            self.format,
            self.intake.clock().now(),
        );
        let json = document.to_pretty_json()?;

        tokio::fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|source| ExportError::Write {
                path: self.export_dir.clone(),
                source,
            })?;
        let path = self.export_dir.join(document.file_name());
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;

        self.intake.persist_responses(state.responses()).await?;

        let receipt = ExportReceipt::from(&document);
        info!(
            path = %path.display(),
            responses = receipt.response_count,
            percentage = receipt.completion_percentage,
            "responses exported"
        );

        self.send_to_sink(document);
        Ok(ExportOutcome { path, receipt })
    }

    fn send_to_sink(&self, document: ExportDocument) {
        let sync = Arc::clone(&self.sync);
        tokio::spawn(async move {
            match sync.export_data(&document).await {
                Ok(reply) => debug!(export_id = %reply.export_id, "export sent to sink"),
                Err(SyncError::Disabled) => {}
                Err(err) => warn!(error = %err, "export sink failed"),
            }
        });
    }

    /// Read an exported file and make its answers the stored responses.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Read` if the file cannot be read,
    /// `ExportError::Document` if it is not an export, and
    /// `ExportError::Intake` if the store rejects the write.
    pub async fn import(&self, path: &Path) -> Result<Responses, ExportError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ExportError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let document = ExportDocument::from_json(&raw)?;
        self.intake.persist_responses(&document.responses).await?;
        info!(
            path = %path.display(),
            responses = document.responses.answered_count(),
            "responses imported"
        );
        Ok(document.responses)
    }
}
