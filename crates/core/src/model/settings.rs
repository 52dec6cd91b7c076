use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_AUTOSAVE_SECS: u32 = 10;
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// Shape of the exported document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Responses map only.
    Raw,
    /// Responses map plus each answer joined with its question text.
    #[default]
    WithQuestions,
}

impl FromStr for ExportFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "with-questions" | "with_questions" => Ok(Self::WithQuestions),
            other => Err(SettingsError::UnknownExportFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("invalid sync URL")]
    InvalidSyncUrl,
    #[error("auto-save delay must be between 1 and 3600 seconds")]
    InvalidAutosaveDelay,
    #[error("unknown export format: {0}")]
    UnknownExportFormat(String),
}

/// Validated runtime configuration for an intake session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntakeSettings {
    sync_base_url: Option<String>,
    autosave_delay_secs: u32,
    export_dir: PathBuf,
    export_format: ExportFormat,
}

#[derive(Clone, Debug, Default)]
pub struct IntakeSettingsDraft {
    pub sync_base_url: Option<String>,
    pub autosave_delay_secs: Option<u32>,
    pub export_dir: Option<PathBuf>,
    pub export_format: Option<ExportFormat>,
}

impl IntakeSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and fill defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the sync URL does not parse or the delay is out of range.
    pub fn validate(self) -> Result<IntakeSettings, SettingsError> {
        let sync_base_url = self
            .sync_base_url
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty());

        if let Some(url) = sync_base_url.as_ref() {
            if Url::parse(url).is_err() {
                return Err(SettingsError::InvalidSyncUrl);
            }
        }

        let autosave_delay_secs = self.autosave_delay_secs.unwrap_or(DEFAULT_AUTOSAVE_SECS);
        if !(1..=3600).contains(&autosave_delay_secs) {
            return Err(SettingsError::InvalidAutosaveDelay);
        }

        Ok(IntakeSettings {
            sync_base_url,
            autosave_delay_secs,
            export_dir: self
                .export_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR)),
            export_format: self.export_format.unwrap_or_default(),
        })
    }
}

impl IntakeSettings {
    #[must_use]
    pub fn sync_base_url(&self) -> Option<&str> {
        self.sync_base_url.as_deref()
    }

    #[must_use]
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_secs(u64::from(self.autosave_delay_secs))
    }

    #[must_use]
    pub fn export_dir(&self) -> &PathBuf {
        &self.export_dir
    }

    #[must_use]
    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            sync_base_url: None,
            autosave_delay_secs: DEFAULT_AUTOSAVE_SECS,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            export_format: ExportFormat::default(),
        }
    }
}
