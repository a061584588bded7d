//! Job definitions and status records for polling.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::{Segment, TextPlacement};

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job accepted, waiting for a worker slot
    #[default]
    Queued,
    /// Job is actively being processed
    Processing,
    /// All shorts were produced
    Completed,
    /// Job failed; no shorts are reported
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One vertical short produced from a segment of the source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShortClip {
    /// Position in planner order (0-based)
    pub index: usize,
    /// Output file path
    pub path: PathBuf,
    /// Normalized segment that was rendered
    pub segment: Segment,
    /// Caption-safe vertical placement for this short
    pub text_placement: TextPlacement,
}

/// Status record of a job, as stored in the job store and returned to pollers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JobRecord {
    /// Unique job ID
    pub id: JobId,

    /// Submitted video URL
    pub video_url: String,

    /// Current status
    pub status: JobStatus,

    /// Title reported by the video source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,

    /// Number of segments planned (0 until planning ran)
    #[serde(default)]
    pub segments_total: u32,

    /// Number of segments rendered so far
    #[serde(default)]
    pub segments_completed: u32,

    /// Human-readable current step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,

    /// Produced shorts (only populated on completion)
    #[serde(default)]
    pub shorts: Vec<ShortClip>,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new queued job for a URL.
    pub fn new(video_url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            video_url: video_url.into(),
            status: JobStatus::Queued,
            video_title: None,
            segments_total: 0,
            segments_completed: 0,
            current_step: None,
            shorts: Vec::new(),
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to processing.
    pub fn start(&mut self) {
        self.status = JobStatus::Processing;
        self.touch();
    }

    /// Record the current step.
    pub fn set_step(&mut self, step: impl Into<String>) {
        self.current_step = Some(step.into());
        self.touch();
    }

    /// Record the planned segment count.
    pub fn set_segments_total(&mut self, total: usize) {
        self.segments_total = total as u32;
        self.touch();
    }

    /// Record one more rendered segment.
    pub fn record_segment_done(&mut self) {
        self.segments_completed += 1;
        self.touch();
    }

    /// Mark the job completed with its shorts.
    pub fn complete(&mut self, shorts: Vec<ShortClip>) {
        self.status = JobStatus::Completed;
        self.segments_completed = shorts.len() as u32;
        self.shorts = shorts;
        self.current_step = None;
        self.error_message = None;
        self.touch();
    }

    /// Mark the job failed. Shorts produced before the failure are not reported.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error_message = Some(error.into());
        self.shorts.clear();
        self.current_step = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(index: usize) -> ShortClip {
        ShortClip {
            index,
            path: PathBuf::from(format!("/tmp/short_{}.mp4", index)),
            segment: Segment::new(0.0, 30.0),
            text_placement: TextPlacement::fallback(),
        }
    }

    #[test]
    fn test_job_creation() {
        let job = JobRecord::new("https://youtube.com/watch?v=abc");
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.shorts.is_empty());
        assert!(!job.status.is_terminal());
    }

    #[test]
    fn test_job_completion() {
        let mut job = JobRecord::new("https://example.com/v");
        job.start();
        assert_eq!(job.status, JobStatus::Processing);

        job.complete(vec![clip(0), clip(1)]);
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.segments_completed, 2);
        assert!(job.status.is_terminal());
    }

    #[test]
    fn test_job_failure_keeps_progress_count() {
        let mut job = JobRecord::new("https://example.com/v");
        job.start();
        job.set_segments_total(2);
        job.record_segment_done();
        job.fail("FFmpeg exited with status 1");

        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.segments_completed, 1);
        assert!(job.shorts.is_empty());
        assert_eq!(job.error_message.as_deref(), Some("FFmpeg exited with status 1"));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&JobStatus::Processing).unwrap(), "\"processing\"");
    }
}
