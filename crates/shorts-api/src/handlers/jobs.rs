//! Job submission and status polling handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use shorts_models::{JobId, JobRecord, JobStatus};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::validate_video_url;
use crate::state::AppState;

/// Job submission request.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub url: String,
}

/// Job submission response.
#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: String,
    pub status: JobStatus,
}

/// Submit a video URL for processing.
pub async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<CreateJobResponse>)> {
    let url = validate_video_url(&request.url).map_err(|e| {
        warn!(url = %request.url, "Rejected job submission: {}", e);
        metrics::record_job_rejected("invalid_url");
        ApiError::bad_request(e.to_string())
    })?;

    let record = state.executor.submit(&url).await?;
    info!(job_id = %record.id, "Accepted job");

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateJobResponse {
            job_id: record.id.to_string(),
            status: record.status,
        }),
    ))
}

/// Get the current record for a job.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobRecord>> {
    let id = JobId::from_string(job_id);
    state
        .jobs()
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Job {} not found", id)))
}

/// List all known jobs, newest first.
pub async fn list_jobs(State(state): State<AppState>) -> Json<Vec<JobRecord>> {
    Json(state.jobs().list().await)
}
