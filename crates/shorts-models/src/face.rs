//! Face detection value types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Frame width assumed when the real resolution cannot be probed.
pub const DEFAULT_FRAME_WIDTH: u32 = 1080;
/// Frame height assumed when the real resolution cannot be probed.
pub const DEFAULT_FRAME_HEIGHT: u32 = 1920;

/// Frame or video resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_WIDTH, DEFAULT_FRAME_HEIGHT)
    }
}

/// Face bounding box in pixel coordinates of a specific frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceBox {
    /// Left edge x-coordinate
    pub x: f64,
    /// Top edge y-coordinate
    pub y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
}

impl FaceBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center x-coordinate.
    #[inline]
    pub fn cx(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Center y-coordinate.
    #[inline]
    pub fn cy(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Center point `(cx, cy)`.
    pub fn center(&self) -> (f64, f64) {
        (self.cx(), self.cy())
    }
}

/// Center of a [`FaceBox`] normalized by the frame resolution.
///
/// Both coordinates are guaranteed to lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelativeFacePosition {
    pub x: f64,
    pub y: f64,
}

impl RelativeFacePosition {
    /// Normalize a face box center against the resolution of the frame it came from.
    ///
    /// Out-of-range results are rejected rather than clamped.
    pub fn from_face_box(face: &FaceBox, resolution: Resolution) -> ModelResult<Self> {
        if resolution.width == 0 || resolution.height == 0 {
            return Err(ModelError::InvalidResolution {
                width: resolution.width,
                height: resolution.height,
            });
        }

        let (cx, cy) = face.center();
        let x = cx / resolution.width as f64;
        let y = cy / resolution.height as f64;

        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return Err(ModelError::PositionOutOfRange { x, y });
        }

        Ok(Self { x, y })
    }
}
