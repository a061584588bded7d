//! Router tests over in-memory media fakes.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use shorts_api::{create_router, ApiConfig, AppState};
use shorts_worker::testing::{FakeDetector, FakeSampler, FakeSource, FakeTranscoder};
use shorts_worker::{InMemoryJobStore, JobExecutor, ShortsProcessor, WorkerConfig};

fn executor(duration: f64, work_dir: &Path) -> JobExecutor {
    let config = WorkerConfig {
        work_dir: work_dir.to_path_buf(),
        ..Default::default()
    };
    JobExecutor::new(ShortsProcessor::new(
        config,
        Arc::new(InMemoryJobStore::new()),
        Arc::new(FakeSource::with_duration(duration)),
        Arc::new(FakeSampler::default()),
        Arc::new(FakeTranscoder::default()),
        Arc::new(FakeDetector::face_at(0.9)),
    ))
}

fn app(executor: &JobExecutor) -> Router {
    let state = AppState::with_executor(ApiConfig::default(), executor.clone());
    create_router(state, None)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn submit(url: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/jobs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "url": url }).to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_submit_and_poll_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(75.0, dir.path());

    let (status, body) = send(app(&executor), submit("https://www.youtube.com/watch?v=abc")).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "queued");
    let job_id = body["job_id"].as_str().unwrap().to_string();

    executor.wait_for_jobs().await;

    let (status, job) = send(app(&executor), get(&format!("/api/jobs/{}", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(job["status"], "completed");
    assert_eq!(job["segments_total"], 2);
    assert_eq!(job["segments_completed"], 2);

    let shorts = job["shorts"].as_array().unwrap();
    assert_eq!(shorts.len(), 2);
    assert_eq!(shorts[0]["segment"]["start"], 0.0);
    assert_eq!(shorts[1]["segment"]["start"], 30.0);
    assert_eq!(shorts[1]["segment"]["end"], 60.0);
    assert!(shorts[0]["path"].as_str().unwrap().ends_with("short_1.mp4"));
}

#[tokio::test]
async fn test_short_video_fails_job() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(20.0, dir.path());

    let (_, body) = send(app(&executor), submit("https://example.com/clip")).await;
    let job_id = body["job_id"].as_str().unwrap().to_string();
    executor.wait_for_jobs().await;

    let (_, job) = send(app(&executor), get(&format!("/api/jobs/{}", job_id))).await;
    assert_eq!(job["status"], "failed");
    assert!(job["error_message"].as_str().unwrap().contains("too short"));
    assert_eq!(job["shorts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_rejects_invalid_urls() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(45.0, dir.path());

    for url in ["ftp://example.com/video.mp4", "not a url", ""] {
        let (status, body) = send(app(&executor), submit(url)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "url {:?}", url);
        assert!(body["detail"].is_string());
    }
    assert!(executor.store().list().await.is_empty());
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(45.0, dir.path());

    let (status, body) = send(app(&executor), get("/api/jobs/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("does-not-exist"));
}

#[tokio::test]
async fn test_list_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(45.0, dir.path());

    let (status, body) = send(app(&executor), get("/api/jobs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    send(app(&executor), submit("https://example.com/a")).await;
    send(app(&executor), submit("https://example.com/b")).await;
    executor.wait_for_jobs().await;

    let (_, body) = send(app(&executor), get("/api/jobs")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_submission_after_shutdown_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(45.0, dir.path());
    executor.shutdown(Duration::from_secs(1)).await;

    let (status, body) = send(app(&executor), submit("https://example.com/a")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_health_sets_headers() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(45.0, dir.path());

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = app(&executor).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let executor = executor(45.0, dir.path());

    let response = app(&executor).oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
