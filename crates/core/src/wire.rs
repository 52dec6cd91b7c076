//! JSON bodies exchanged with the progress endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Responses;

/// `POST /api/save-progress` and `POST /api/submit-form`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressRequest {
    #[serde(default)]
    pub responses: Option<Responses>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default)]
    pub is_auto_save: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// The fields of an export document that `POST /api/export-data` reads.
/// Clients send the whole document; the remaining fields are ignored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDataRequest {
    #[serde(default)]
    pub responses: Option<Responses>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDataResponse {
    pub success: bool,
    pub message: String,
    pub export_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadProgressResponse {
    pub progress: Option<Responses>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFormResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub response_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
