//! Job executor.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use shorts_models::{JobId, JobRecord};

use crate::error::{WorkerError, WorkerResult};
use crate::job_store::{update_job, JobStore};
use crate::metrics;
use crate::processor::ShortsProcessor;

/// Spawns one task per submitted job, bounded by a semaphore.
#[derive(Clone)]
pub struct JobExecutor {
    processor: Arc<ShortsProcessor>,
    job_semaphore: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    shutting_down: Arc<AtomicBool>,
}

impl JobExecutor {
    /// Create a new job executor.
    pub fn new(processor: ShortsProcessor) -> Self {
        let max_jobs = processor.config().max_concurrent_jobs.max(1);
        info!("Starting job executor with {} max concurrent jobs", max_jobs);
        Self {
            processor: Arc::new(processor),
            job_semaphore: Arc::new(Semaphore::new(max_jobs)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        self.processor.store()
    }

    /// Register a queued job for `url` and start processing it in the background.
    pub async fn submit(&self, url: &str) -> WorkerResult<JobRecord> {
        if self.shutting_down.load(Ordering::SeqCst) {
            return Err(WorkerError::ShuttingDown);
        }

        let record = JobRecord::new(url);
        self.store().put(record.clone()).await;
        metrics::record_job_submitted();
        info!(job_id = %record.id, url = %url, "Job queued");

        self.spawn(record.id.clone());
        Ok(record)
    }

    fn spawn(&self, job_id: JobId) {
        let processor = Arc::clone(&self.processor);
        let semaphore = Arc::clone(&self.job_semaphore);
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    let started = Instant::now();
                    let worker = Arc::clone(&processor);
                    let id = job_id.clone();
                    // Inner task so a panicking pipeline still releases its slot
                    let handle = tokio::spawn(async move { worker.run(&id).await });
                    match handle.await {
                        Ok(Ok(_)) => {}
                        Ok(Err(e)) => error!("Job {} could not run: {}", job_id, e),
                        Err(e) => {
                            error!("Job {} aborted: {}", job_id, e);
                            metrics::record_job_failed("panic", started.elapsed().as_secs_f64());
                            update_job(processor.store().as_ref(), &job_id, |j| {
                                j.fail("Job aborted unexpectedly")
                            })
                            .await;
                        }
                    }
                }
                Err(_) => error!("Job {} dropped: executor semaphore closed", job_id),
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
        });
    }

    /// Number of jobs submitted but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Stop accepting jobs and wait up to `timeout` for in-flight jobs to finish.
    pub async fn shutdown(&self, timeout: Duration) {
        self.shutting_down.store(true, Ordering::SeqCst);
        info!("Waiting for {} in-flight jobs to complete...", self.in_flight());

        if tokio::time::timeout(timeout, self.wait_for_jobs()).await.is_err() {
            warn!(
                "Shutdown timeout elapsed with {} jobs still running",
                self.in_flight()
            );
        }
        info!("Job executor stopped");
    }

    /// Wait for all in-flight jobs to complete.
    pub async fn wait_for_jobs(&self) {
        while self.in_flight() > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkerConfig;
    use crate::job_store::InMemoryJobStore;
    use crate::testing::{FakeDetector, FakeSampler, FakeSource, FakeTranscoder};
    use shorts_models::JobStatus;

    fn executor(duration: f64, work_dir: &std::path::Path) -> JobExecutor {
        let config = WorkerConfig {
            work_dir: work_dir.to_path_buf(),
            max_concurrent_jobs: 1,
            ..Default::default()
        };
        JobExecutor::new(ShortsProcessor::new(
            config,
            Arc::new(InMemoryJobStore::new()),
            Arc::new(FakeSource::with_duration(duration)),
            Arc::new(FakeSampler::default()),
            Arc::new(FakeTranscoder::default()),
            Arc::new(FakeDetector::none()),
        ))
    }

    #[tokio::test]
    async fn test_submit_runs_to_completion() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor(61.0, dir.path());

        let queued = executor.submit("https://example.com/v").await.unwrap();
        assert_eq!(queued.status, JobStatus::Queued);

        executor.wait_for_jobs().await;
        let record = executor.store().get(&queued.id).await.unwrap();
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.shorts.len(), 2);
    }

    #[tokio::test]
    async fn test_jobs_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor(45.0, dir.path());

        let a = executor.submit("https://example.com/a").await.unwrap();
        let b = executor.submit("https://example.com/b").await.unwrap();
        executor.wait_for_jobs().await;

        for id in [&a.id, &b.id] {
            let record = executor.store().get(id).await.unwrap();
            assert_eq!(record.status, JobStatus::Completed);
            assert!(record.shorts[0].path.starts_with(dir.path().join(id.as_str())));
        }
        assert_eq!(executor.store().list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_rejects_after_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let executor = executor(45.0, dir.path());
        executor.shutdown(Duration::from_secs(1)).await;

        let result = executor.submit("https://example.com/v").await;
        assert!(matches!(result, Err(WorkerError::ShuttingDown)));
    }

    struct PanickingSource;

    #[async_trait::async_trait]
    impl shorts_media::VideoSource for PanickingSource {
        async fn fetch_info(&self, _url: &str) -> shorts_media::MediaResult<shorts_models::SourceVideo> {
            panic!("metadata parser blew up");
        }

        async fn fetch_file(
            &self,
            _url: &str,
            _video_id: &str,
            _dir: &std::path::Path,
        ) -> shorts_media::MediaResult<std::path::PathBuf> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_panicking_job_is_failed_and_released() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkerConfig {
            work_dir: dir.path().to_path_buf(),
            max_concurrent_jobs: 1,
            ..Default::default()
        };
        let executor = JobExecutor::new(ShortsProcessor::new(
            config,
            Arc::new(InMemoryJobStore::new()),
            Arc::new(PanickingSource),
            Arc::new(FakeSampler::default()),
            Arc::new(FakeTranscoder::default()),
            Arc::new(FakeDetector::none()),
        ));

        let queued = executor.submit("https://example.com/v").await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), executor.wait_for_jobs())
            .await
            .expect("in-flight count must drop after a panic");

        assert_eq!(executor.in_flight(), 0);
        let record = executor.store().get(&queued.id).await.unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert!(record.error_message.unwrap().contains("aborted"));
    }
}
