//! One-shot shorts worker: processes a single URL and prints the job record as JSON.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shorts_models::JobStatus;
use shorts_worker::{InMemoryJobStore, JobExecutor, ShortsProcessor, WorkerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }

    let Some(url) = std::env::args().nth(1) else {
        eprintln!("usage: shorts-worker <video-url>");
        std::process::exit(2);
    };

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);
    if !shorts_media::face_detection_available() {
        warn!("Built without the `opencv` feature: face detection is disabled and every caption placement uses the 0.83 fallback");
    }

    let shutdown_timeout = config.shutdown_timeout;
    let store = Arc::new(InMemoryJobStore::new());
    let executor = JobExecutor::new(ShortsProcessor::from_config(config, store));

    let record = match executor.submit(&url).await {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to submit job: {}", e);
            std::process::exit(1);
        }
    };

    tokio::select! {
        _ = executor.wait_for_jobs() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            executor.shutdown(shutdown_timeout).await;
        }
    }

    let Some(record) = executor.store().get(&record.id).await else {
        error!("Job {} vanished from the store", record.id);
        std::process::exit(1);
    };

    match serde_json::to_string_pretty(&record) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize job record: {}", e),
    }

    if record.status != JobStatus::Completed {
        std::process::exit(1);
    }
}
