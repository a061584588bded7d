//! Segment selection: which time ranges of a source become shorts.

mod normalizer;
mod planner;

pub use normalizer::normalize_segment;
pub use planner::plan_segments;

use serde::{Deserialize, Serialize};

/// Shortest usable short, in seconds.
pub const MIN_SHORT_LENGTH: f64 = 30.0;
/// Latest nominal end of any planned window, in seconds.
pub const MAX_SHORT_LENGTH: f64 = 60.0;

/// Duration constraints shared by the planner and the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub min_short_length: f64,
    pub max_short_length: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            min_short_length: MIN_SHORT_LENGTH,
            max_short_length: MAX_SHORT_LENGTH,
        }
    }
}
