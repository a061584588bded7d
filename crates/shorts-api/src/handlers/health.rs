//! Health check handlers.

use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use shorts_media::{check_ffmpeg, check_ffprobe, check_ytdlp, MediaResult};

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub ffmpeg: CheckStatus,
    pub ffprobe: CheckStatus,
    pub ytdlp: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckStatus {
    fn from_lookup(result: MediaResult<std::path::PathBuf>) -> Self {
        match result {
            Ok(path) => Self {
                status: "ok".to_string(),
                path: Some(path.display().to_string()),
                error: None,
            },
            Err(e) => Self {
                status: "error".to_string(),
                path: None,
                error: Some(e.to_string()),
            },
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Readiness check endpoint (readiness probe).
/// Checks that the media tools are on PATH.
pub async fn ready() -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let checks = ReadinessChecks {
        ffmpeg: CheckStatus::from_lookup(check_ffmpeg()),
        ffprobe: CheckStatus::from_lookup(check_ffprobe()),
        ytdlp: CheckStatus::from_lookup(check_ytdlp()),
    };

    let all_ok = checks.ffmpeg.is_ok() && checks.ffprobe.is_ok() && checks.ytdlp.is_ok();

    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "degraded" }.to_string(),
        checks,
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
