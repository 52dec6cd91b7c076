use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Responses;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoSaveState {
    Idle,
    Saving,
}

/// What the auto-save indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveStatus {
    pub state: AutoSaveState,
    pub last_saved: Option<DateTime<Utc>>,
}

impl AutoSaveStatus {
    #[must_use]
    pub fn idle() -> Self {
        Self {
            state: AutoSaveState::Idle,
            last_saved: None,
        }
    }

    #[must_use]
    pub fn begin(self) -> Self {
        Self {
            state: AutoSaveState::Saving,
            ..self
        }
    }

    #[must_use]
    pub fn finish(self, at: DateTime<Utc>) -> Self {
        Self {
            state: AutoSaveState::Idle,
            last_saved: Some(at),
        }
    }

    /// Back to idle after a failed save; `last_saved` is kept.
    #[must_use]
    pub fn abandon(self) -> Self {
        Self {
            state: AutoSaveState::Idle,
            ..self
        }
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.state == AutoSaveState::Saving
    }

    /// Nothing to show until the first save starts.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.is_saving() || self.last_saved.is_some()
    }
}

impl Default for AutoSaveStatus {
    fn default() -> Self {
        Self::idle()
    }
}

/// The auto-save entry kept next to the live responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSaveSnapshot {
    pub data: Responses,
    pub timestamp: DateTime<Utc>,
}

impl AutoSaveSnapshot {
    #[must_use]
    pub fn new(data: Responses, timestamp: DateTime<Utc>) -> Self {
        Self { data, timestamp }
    }
}
