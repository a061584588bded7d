//! Job registry shared between the executor and the HTTP layer.

use async_trait::async_trait;
use shorts_models::{JobId, JobRecord};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage for job status records.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, id: &JobId) -> Option<JobRecord>;

    /// Insert or replace the record under its id.
    async fn put(&self, record: JobRecord);

    /// All records, newest first.
    async fn list(&self) -> Vec<JobRecord>;
}

/// Process-lifetime job store.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, JobRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn get(&self, id: &JobId) -> Option<JobRecord> {
        self.jobs.read().await.get(id).cloned()
    }

    async fn put(&self, record: JobRecord) {
        self.jobs.write().await.insert(record.id.clone(), record);
    }

    async fn list(&self) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = self.jobs.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }
}

/// Apply `f` to the stored record, returning the updated copy.
pub async fn update_job<F>(store: &dyn JobStore, id: &JobId, f: F) -> Option<JobRecord>
where
    F: FnOnce(&mut JobRecord) + Send,
{
    let mut record = store.get(id).await?;
    f(&mut record);
    store.put(record.clone()).await;
    Some(record)
}
