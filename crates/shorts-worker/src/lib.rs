//! Shorts job processing.
//!
//! This crate provides:
//! - Job store trait with an in-memory implementation
//! - Per-job pipeline over the media ports
//! - Bounded job executor with graceful shutdown

pub mod config;
pub mod error;
pub mod executor;
pub mod job_store;
pub mod logging;
pub mod metrics;
pub mod processor;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use job_store::{InMemoryJobStore, JobStore};
pub use logging::JobLogger;
pub use processor::ShortsProcessor;
