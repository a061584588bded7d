//! Application state.

use std::sync::Arc;

use shorts_worker::{InMemoryJobStore, JobExecutor, JobStore, ShortsProcessor, WorkerConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub executor: JobExecutor,
}

impl AppState {
    /// State over the real media tools and an in-memory job store.
    pub fn new(config: ApiConfig, worker_config: WorkerConfig) -> Self {
        let store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::new());
        let executor = JobExecutor::new(ShortsProcessor::from_config(worker_config, store));
        Self::with_executor(config, executor)
    }

    pub fn with_executor(config: ApiConfig, executor: JobExecutor) -> Self {
        Self { config, executor }
    }

    pub fn jobs(&self) -> &Arc<dyn JobStore> {
        self.executor.store()
    }
}
