//! Time windows of a source video.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, ModelResult};

/// A contiguous time range of the source video, in seconds.
///
/// Segments are value objects; two segments with the same bounds are the same segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Start time in seconds (inclusive)
    pub start: f64,
    /// End time in seconds (exclusive)
    pub end: f64,
}

impl Segment {
    /// Create a segment without validation.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Create a segment that satisfies `0 <= start < end <= video_duration`.
    pub fn checked(start: f64, end: f64, video_duration: f64) -> ModelResult<Self> {
        if start >= 0.0 && start < end && end <= video_duration {
            Ok(Self { start, end })
        } else {
            Err(ModelError::InvalidSegment { start, end })
        }
    }

    /// Segment length in seconds.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}s, {:.2}s)", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let seg = Segment::new(5.0, 35.0);
        assert!((seg.duration() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_checked_rejects_inverted_and_overlong() {
        assert!(Segment::checked(0.0, 30.0, 45.0).is_ok());
        assert!(Segment::checked(30.0, 30.0, 45.0).is_err());
        assert!(Segment::checked(-1.0, 30.0, 45.0).is_err());
        assert!(Segment::checked(10.0, 50.0, 45.0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Segment::new(0.0, 30.0).to_string(), "[0.00s, 30.00s)");
    }
}
