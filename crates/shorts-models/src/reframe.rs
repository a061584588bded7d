//! Vertical reframe parameters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output width of every short.
pub const TARGET_WIDTH: u32 = 1080;
/// Output height of every short.
pub const TARGET_HEIGHT: u32 = 1920;

/// Scale + center-crop parameters converting any source into a 9:16 frame.
///
/// The source is first scaled (non-distorting) so its height equals `target_height`,
/// then center-cropped to `crop_width`x`crop_height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReframeSpec {
    pub target_width: u32,
    pub target_height: u32,
    pub crop_width: u32,
    pub crop_height: u32,
}

impl Default for ReframeSpec {
    fn default() -> Self {
        Self::vertical()
    }
}

impl ReframeSpec {
    /// The fixed 1080x1920 vertical spec.
    pub const fn vertical() -> Self {
        Self {
            target_width: TARGET_WIDTH,
            target_height: TARGET_HEIGHT,
            crop_width: TARGET_WIDTH,
            crop_height: TARGET_HEIGHT,
        }
    }

    /// FFmpeg video filter chain: proportional scale to target height, then center crop.
    ///
    /// `crop` centers by default when no x/y offset is given.
    pub fn video_filter(&self) -> String {
        format!(
            "scale=-2:{},crop={}:{}",
            self.target_height, self.crop_width, self.crop_height
        )
    }
}
