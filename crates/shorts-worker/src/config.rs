//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use shorts_media::{CaptionConfig, FaceDetectorConfig, SegmentConfig};
use shorts_models::{EncodingConfig, JobId};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum concurrent jobs
    pub max_concurrent_jobs: usize,
    /// Work directory for downloads, shorts and sampled frames
    pub work_dir: PathBuf,
    /// Per-invocation FFmpeg timeout
    pub ffmpeg_timeout: Duration,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
    /// YuNet model override
    pub face_model_path: Option<PathBuf>,
    pub segment: SegmentConfig,
    pub caption: CaptionConfig,
    pub encoding: EncodingConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 2,
            work_dir: PathBuf::from("/tmp/shorts"),
            ffmpeg_timeout: Duration::from_secs(900),
            shutdown_timeout: Duration::from_secs(60),
            face_model_path: None,
            segment: SegmentConfig::default(),
            caption: CaptionConfig::default(),
            encoding: EncodingConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_concurrent_jobs: std::env::var("WORKER_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_concurrent_jobs),
            work_dir: std::env::var("WORKER_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            ffmpeg_timeout: Duration::from_secs(
                std::env::var("WORKER_FFMPEG_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(900),
            ),
            shutdown_timeout: Duration::from_secs(
                std::env::var("WORKER_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            face_model_path: std::env::var("FACE_MODEL_PATH")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            ..defaults
        }
    }

    /// Directory holding one job's download and shorts.
    pub fn job_dir(&self, job_id: &JobId) -> PathBuf {
        self.work_dir.join(job_id.as_str())
    }

    /// Directory for one job's sampled frames.
    pub fn frames_dir(&self, job_id: &JobId) -> PathBuf {
        self.job_dir(job_id).join("frames")
    }

    /// Face detector settings with the configured model path applied.
    pub fn face_detector(&self) -> FaceDetectorConfig {
        match &self.face_model_path {
            Some(path) => FaceDetectorConfig::default().with_model_path(path),
            None => FaceDetectorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_dirs() {
        let config = WorkerConfig::default();
        let id = JobId::from_string("abc");
        assert_eq!(config.job_dir(&id), PathBuf::from("/tmp/shorts/abc"));
        assert_eq!(config.frames_dir(&id), PathBuf::from("/tmp/shorts/abc/frames"));
    }

    #[test]
    fn test_face_model_override() {
        let config = WorkerConfig {
            face_model_path: Some(PathBuf::from("/models/yunet.onnx")),
            ..Default::default()
        };
        assert_eq!(config.face_detector().model_path, PathBuf::from("/models/yunet.onnx"));
        assert_eq!(
            WorkerConfig::default().face_detector(),
            FaceDetectorConfig::default()
        );
    }
}
