//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use intake_core::export::ExportDocumentError;
use intake_core::model::{FormError, SchemaError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the progress sync client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error("progress sync is not configured")]
    Disabled,
    #[error("progress sync request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `IntakeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntakeError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AutoSaver`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AutoSaveError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
}

/// Errors emitted by `ExportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("an export is already running")]
    Busy,
    #[error(transparent)]
    Document(#[from] ExportDocumentError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Intake(#[from] IntakeError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("failed to read schema file {path}: {source}")]
    SchemaFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
