use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use intake_core::wire::{
    ExportDataRequest, ExportDataResponse, LoadProgressResponse, SaveProgressRequest,
    SaveProgressResponse, SubmitFormResponse,
};

use crate::{ApiError, ApiState};

fn requester(email: Option<&str>) -> &str {
    email.filter(|value| !value.trim().is_empty()).unwrap_or("anonymous")
}

/// POST /api/save-progress
pub async fn save_progress(
    State(state): State<ApiState>,
    body: Result<Json<SaveProgressRequest>, JsonRejection>,
) -> Result<Json<SaveProgressResponse>, ApiError> {
    let Json(request) = body?;
    let responses = request.responses.ok_or(ApiError::MissingResponses)?;

    info!(
        user = requester(request.user_email.as_deref()),
        responses = responses.len(),
        auto_save = request.is_auto_save,
        "saving progress"
    );
    tokio::time::sleep(state.config.save_delay).await;

    Ok(Json(SaveProgressResponse {
        message: "Progress saved successfully".to_string(),
        timestamp: Utc::now(),
    }))
}

/// POST /api/export-data
pub async fn export_data(
    State(state): State<ApiState>,
    body: Result<Json<ExportDataRequest>, JsonRejection>,
) -> Result<Json<ExportDataResponse>, ApiError> {
    let Json(request) = body?;
    let now = Utc::now();

    info!(
        user = requester(request.user_email.as_deref()),
        responses = request.responses.as_ref().map_or(0, |r| r.len()),
        requested_at = ?request.timestamp,
        "data export requested"
    );
    tokio::time::sleep(state.config.export_delay).await;

    Ok(Json(ExportDataResponse {
        success: true,
        message: "Data exported successfully".to_string(),
        export_id: format!("export_{}", now.timestamp_millis()),
        timestamp: now,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadProgressQuery {
    pub user_email: Option<String>,
}

/// GET /api/load-progress?userEmail=
pub async fn load_progress(
    State(state): State<ApiState>,
    query: Result<Query<LoadProgressQuery>, QueryRejection>,
) -> Result<Json<LoadProgressResponse>, ApiError> {
    let Query(query) = query?;
    let email = query
        .user_email
        .filter(|value| !value.trim().is_empty())
        .ok_or(ApiError::MissingEmail)?;

    info!(user = %email, "loading progress");
    tokio::time::sleep(state.config.load_delay).await;

    Ok(Json(LoadProgressResponse {
        progress: None,
        message: "No server-side progress found. Check local storage.".to_string(),
    }))
}

/// POST /api/submit-form
pub async fn submit_form(
    body: Result<Json<SaveProgressRequest>, JsonRejection>,
) -> Result<Json<SubmitFormResponse>, ApiError> {
    let Json(request) = body?;
    let responses = request.responses.ok_or(ApiError::MissingResponses)?;
    let now = Utc::now();

    info!(
        user = requester(request.user_email.as_deref()),
        responses = responses.len(),
        "form submitted"
    );

    Ok(Json(SubmitFormResponse {
        message: "Form submitted successfully! Data has been logged.".to_string(),
        timestamp: now,
        response_count: responses.len(),
    }))
}
