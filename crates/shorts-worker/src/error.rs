//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Executor is shutting down")]
    ShuttingDown,

    #[error("{0}")]
    Media(#[from] shorts_media::MediaError),

    #[error("{0}")]
    Model(#[from] shorts_models::ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }

    pub fn processing_failed(msg: impl Into<String>) -> Self {
        Self::ProcessingFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Check if the failure comes from the submitted video rather than the host.
    pub fn is_input_error(&self) -> bool {
        match self {
            WorkerError::Media(e) => e.is_input_error(),
            WorkerError::Model(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorts_media::MediaError;

    #[test]
    fn test_media_errors_keep_their_message() {
        let err: WorkerError = MediaError::InsufficientDuration {
            duration: 12.0,
            minimum: 30.0,
        }
        .into();
        assert_eq!(err.to_string(), "Video too short: 12.00s (minimum 30s)");
        assert!(err.is_input_error());
    }

    #[test]
    fn test_model_errors_are_input_errors() {
        let err: WorkerError = shorts_models::ModelError::InvalidSegment { start: 0.0, end: 0.0 }.into();
        assert_eq!(err.to_string(), "Invalid segment [0, 0)");
        assert!(err.is_input_error());
    }

    #[test]
    fn test_host_errors_are_not_input_errors() {
        let err: WorkerError = MediaError::FfmpegNotFound.into();
        assert!(!err.is_input_error());
        assert!(!WorkerError::ShuttingDown.is_input_error());
    }
}
