//! Caption-safe vertical text placement.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placement used when no face information is available.
pub const FALLBACK_PLACEMENT: f64 = 0.83;
/// Highest allowed placement (closest to the top).
pub const MIN_PLACEMENT: f64 = 0.7;
/// Lowest allowed placement (closest to the bottom).
pub const MAX_PLACEMENT: f64 = 0.9;
/// Distance kept between the average face height and the caption line.
pub const FACE_CLEARANCE: f64 = 0.15;

/// Vertical fraction of the frame (0 = top, 1 = bottom) at which captions are safe.
///
/// Always within `[MIN_PLACEMENT, MAX_PLACEMENT]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TextPlacement(f64);

impl TextPlacement {
    /// The fallback placement (0.83).
    pub fn fallback() -> Self {
        Self(FALLBACK_PLACEMENT)
    }

    /// Derive a placement from the mean relative y of all detected faces.
    pub fn from_average_face_y(avg_y: f64) -> Self {
        if avg_y.is_nan() {
            return Self::fallback();
        }
        Self((avg_y - FACE_CLEARANCE).clamp(MIN_PLACEMENT, MAX_PLACEMENT))
    }

    /// Placement as a fraction of frame height.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for TextPlacement {
    fn default() -> Self {
        Self::fallback()
    }
}
