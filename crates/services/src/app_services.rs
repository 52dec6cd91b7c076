use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use intake_core::model::{IntakeSettings, Schema};
use storage::repository::Storage;

use crate::Clock;
use crate::autosave::AutoSaver;
use crate::error::AppServicesError;
use crate::export_service::ExportService;
use crate::intake_service::IntakeService;
use crate::sync;

/// Assembles app-facing services around one schema and one store.
#[derive(Clone)]
pub struct AppServices {
    intake: Arc<IntakeService>,
    autosaver: AutoSaver,
    exporter: Arc<ExportService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        schema: Schema,
        settings: &IntakeSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, schema, settings, Handle::current()))
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        schema: Schema,
        settings: &IntakeSettings,
        runtime: Handle,
    ) -> Self {
        let sync = sync::from_base_url(settings.sync_base_url());
        let intake = Arc::new(IntakeService::new(
            clock,
            Arc::new(schema),
            Arc::clone(&storage.form_state),
        ));
        let autosaver = AutoSaver::new(
            Arc::clone(&intake),
            Arc::clone(&sync),
            settings.autosave_delay(),
            runtime,
        );
        let exporter = Arc::new(ExportService::new(
            Arc::clone(&intake),
            sync,
            settings.export_dir().clone(),
            settings.export_format(),
        ));

        info!(
            sync = settings.sync_base_url().unwrap_or("disabled"),
            autosave_secs = settings.autosave_delay().as_secs(),
            export_dir = %settings.export_dir().display(),
            "services ready"
        );

        Self {
            intake,
            autosaver,
            exporter,
        }
    }

    #[must_use]
    pub fn intake(&self) -> Arc<IntakeService> {
        Arc::clone(&self.intake)
    }

    #[must_use]
    pub fn autosaver(&self) -> AutoSaver {
        self.autosaver.clone()
    }

    #[must_use]
    pub fn exporter(&self) -> Arc<ExportService> {
        Arc::clone(&self.exporter)
    }
}

/// Load the built-in schema, or the file at `path` when given.
///
/// # Errors
///
/// Returns `AppServicesError::SchemaFile` if the file cannot be read and
/// `AppServicesError::Schema` if it does not validate.
pub fn load_schema(path: Option<&Path>) -> Result<Schema, AppServicesError> {
    let Some(path) = path else {
        return Ok(Schema::builtin()?);
    };
    let raw = std::fs::read_to_string(path).map_err(|source| AppServicesError::SchemaFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Schema::from_json(&raw)?)
}
