//! Model validation errors.

use thiserror::Error;

/// Result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised when a value object would violate its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A face center fell outside the frame it was normalized against.
    /// This points at a resolution mismatch between the probed video and the frame.
    #[error("Relative face position ({x:.3}, {y:.3}) is outside [0, 1]")]
    PositionOutOfRange { x: f64, y: f64 },

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid segment [{start}, {end})")]
    InvalidSegment { start: f64, end: f64 },
}
