#![forbid(unsafe_code)]

pub mod app_services;
pub mod autosave;
pub mod error;
pub mod export_service;
pub mod intake_service;
pub mod sync;

pub use intake_core::Clock;

pub use app_services::{AppServices, load_schema};
pub use autosave::AutoSaver;
pub use error::{AppServicesError, AutoSaveError, ExportError, IntakeError, SyncError};
pub use export_service::{ExportOutcome, ExportService};
pub use intake_service::IntakeService;
pub use sync::{DisabledSync, HttpProgressSync, ProgressSync};
