use async_trait::async_trait;
use reqwest::Client;

use intake_core::export::ExportDocument;
use intake_core::wire::{
    ExportDataResponse, LoadProgressResponse, SaveProgressRequest, SaveProgressResponse,
};

use crate::error::SyncError;

/// Network sink for progress snapshots and exports.
///
/// Callers treat every failure as best-effort: the local store stays the
/// source of truth.
#[async_trait]
pub trait ProgressSync: Send + Sync {
    /// # Errors
    ///
    /// Returns `SyncError` when the sink is disabled or the request fails.
    async fn save_progress(
        &self,
        request: &SaveProgressRequest,
    ) -> Result<SaveProgressResponse, SyncError>;

    /// Send the exported document, unchanged, to the export sink.
    ///
    /// # Errors
    ///
    /// Returns `SyncError` when the sink is disabled or the request fails.
    async fn export_data(
        &self,
        document: &ExportDocument,
    ) -> Result<ExportDataResponse, SyncError>;

    /// # Errors
    ///
    /// Returns `SyncError` when the sink is disabled or the request fails.
    async fn load_progress(&self, user_email: &str) -> Result<LoadProgressResponse, SyncError>;
}

/// Used when no base URL is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSync;

#[async_trait]
impl ProgressSync for DisabledSync {
    async fn save_progress(
        &self,
        _request: &SaveProgressRequest,
    ) -> Result<SaveProgressResponse, SyncError> {
        Err(SyncError::Disabled)
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

/// JSON client for the `/api/*` endpoints.
#[derive(Clone)]
pub struct HttpProgressSync {
    client: Client,
    base_url: String,
}

impl HttpProgressSync {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{name}", self.base_url)
    }
}

#[async_trait]
impl ProgressSync for HttpProgressSync {
    async fn save_progress(
        &self,
        request: &SaveProgressRequest,
    ) -> Result<SaveProgressResponse, SyncError> {
        let response = self
            .client
            .post(self.endpoint("save-progress"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn export_data(
        &self,
        document: &ExportDocument,
    ) -> Result<ExportDataResponse, SyncError> {
        let response = self
            .client
            .post(self.endpoint("export-data"))
            .json(document)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn load_progress(&self, user_email: &str) -> Result<LoadProgressResponse, SyncError> {
        let response = self
            .client
            .get(self.endpoint("load-progress"))
            .query(&[("userEmail", user_email)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

/// Pick the HTTP client when a base URL is configured.
#[must_use]
pub fn from_base_url(base_url: Option<&str>) -> std::sync::Arc<dyn ProgressSync> {
    match base_url {
        Some(url) => std::sync::Arc::new(HttpProgressSync::new(url)),
        None => std::sync::Arc::new(DisabledSync),
    }
}
