#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use intake_core::export::ExportDocument;
use intake_core::time::fixed_now;
use intake_core::wire::{
    ExportDataResponse, LoadProgressResponse, SaveProgressRequest, SaveProgressResponse,
};
use services::{ProgressSync, SyncError};

/// Records every request and answers like the stub server.
#[derive(Default)]
pub struct RecordingSync {
    pub saves: Mutex<Vec<SaveProgressRequest>>,
    pub exports: Mutex<Vec<ExportDocument>>,
    pub fail: bool,
}

impl RecordingSync {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn export_count(&self) -> usize {
        self.exports.lock().unwrap().len()
    }
}

#[async_trait]
impl ProgressSync for RecordingSync {
    async fn save_progress(
        &self,
        request: &SaveProgressRequest,
    ) -> Result<SaveProgressResponse, SyncError> {
        self.saves.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(SyncError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY));
        }
        Ok(SaveProgressResponse {
            message: "Progress saved successfully".into(),
            timestamp: fixed_now(),
        })
    }

    async fn export_data(
        &self,
        document: &ExportDocument,
    ) -> Result<ExportDataResponse, SyncError> {
        self.exports.lock().unwrap().push(document.clone());
        if self.fail {
            return Err(SyncError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY));
        }
        Ok(ExportDataResponse {
            success: true,
            message: "Data exported successfully".into(),
            export_id: "export_1".into(),
            timestamp: fixed_now(),
        })
    }

    async fn load_progress(&self, _user_email: &str) -> Result<LoadProgressResponse, SyncError> {
        Ok(LoadProgressResponse {
            progress: None,
            message: "No saved progress found".into(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SyncCall {
    pub answer: String,
    pub started: tokio::time::Instant,
    pub finished: tokio::time::Instant,
}

/// Takes `latency` to answer each `save-progress` and tracks overlap.
pub struct SlowSync {
    latency: Duration,
    in_flight: Mutex<usize>,
    max_in_flight: Mutex<usize>,
    started: Mutex<usize>,
    calls: Mutex<Vec<SyncCall>>,
}

impl SlowSync {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            in_flight: Mutex::new(0),
            max_in_flight: Mutex::new(0),
            started: Mutex::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn started(&self) -> usize {
        *self.started.lock().unwrap()
    }

    pub fn max_in_flight(&self) -> usize {
        *self.max_in_flight.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<SyncCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressSync for SlowSync {
    async fn save_progress(
        &self,
        request: &SaveProgressRequest,
    ) -> Result<SaveProgressResponse, SyncError> {
        let started = tokio::time::Instant::now();
        *self.started.lock().unwrap() += 1;
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            *in_flight += 1;
            let mut max = self.max_in_flight.lock().unwrap();
            *max = (*max).max(*in_flight);
        }

        tokio::time::sleep(self.latency).await;

        *self.in_flight.lock().unwrap() -= 1;
        let answer = request
            .responses
            .as_ref()
            .map(|r| r.answer("identity_intro").to_string())
            .unwrap_or_default();
        self.calls.lock().unwrap().push(SyncCall {
            answer,
            started,
            finished: tokio::time::Instant::now(),
        });
        Ok(SaveProgressResponse {
            message: "Progress saved successfully".into(),
            timestamp: fixed_now(),
        })
    }

    async fn export_data(
        &self,
        _document: &ExportDocument,
    ) -> Result<ExportDataResponse, SyncError> {
        Err(SyncError::Disabled)
    }

    async fn load_progress(&self, _user_email: &str) -> Result<LoadProgressResponse, SyncError> {
        Err(SyncError::Disabled)
    }
}
