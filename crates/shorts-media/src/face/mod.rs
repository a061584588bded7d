//! Face location in still images.
//!
//! [`FaceLocator`] wraps a [`FaceDetector`] backend and never fails: a backend
//! error is logged and reported as "no faces".

mod yunet;

pub use yunet::{face_box_from_row, YuNetDetector};

use serde::{Deserialize, Serialize};
use shorts_models::FaceBox;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ports::FaceDetector;

/// Default location of the YuNet ONNX model.
pub const DEFAULT_MODEL_PATH: &str = "models/face_detection_yunet_2023mar.onnx";
/// Minimum detection confidence.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.6;
/// Non-maximum suppression IoU threshold.
pub const DEFAULT_NMS_THRESHOLD: f32 = 0.3;
/// Maximum faces kept per image.
pub const DEFAULT_TOP_K: i32 = 20;

/// Whether this build can run YuNet. Without the `opencv` feature every
/// placement falls back to the default.
pub const fn face_detection_available() -> bool {
    cfg!(feature = "opencv")
}

/// Face detector parameters, passed explicitly at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetectorConfig {
    pub model_path: PathBuf,
    pub score_threshold: f32,
    pub nms_threshold: f32,
    pub top_k: i32,
}

impl Default for FaceDetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl FaceDetectorConfig {
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }
}

/// Infallible face lookup over a detection backend.
#[derive(Clone)]
pub struct FaceLocator {
    detector: Arc<dyn FaceDetector>,
}

impl FaceLocator {
    pub fn new(detector: Arc<dyn FaceDetector>) -> Self {
        Self { detector }
    }

    /// Faces found in `image`, in pixel coordinates of that image.
    pub async fn locate(&self, image: &Path) -> Vec<FaceBox> {
        match self.detector.detect(image).await {
            Ok(faces) => {
                debug!(image = %image.display(), count = faces.len(), "Located faces");
                faces
            }
            Err(e) => {
                warn!(image = %image.display(), error = %e, "Face detection failed, assuming no faces");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MediaError, MediaResult};
    use async_trait::async_trait;

    struct Fixed(Vec<FaceBox>);

    #[async_trait]
    impl FaceDetector for Fixed {
        async fn detect(&self, _image: &Path) -> MediaResult<Vec<FaceBox>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    #[async_trait]
    impl FaceDetector for Broken {
        async fn detect(&self, _image: &Path) -> MediaResult<Vec<FaceBox>> {
            Err(MediaError::detection_failed("corrupt image"))
        }
    }

    #[tokio::test]
    async fn test_passes_faces_through() {
        let face = FaceBox::new(100.0, 200.0, 80.0, 80.0);
        let locator = FaceLocator::new(Arc::new(Fixed(vec![face])));
        assert_eq!(locator.locate(Path::new("f.jpg")).await, vec![face]);
    }

    #[tokio::test]
    async fn test_no_face_is_empty() {
        let locator = FaceLocator::new(Arc::new(Fixed(Vec::new())));
        assert!(locator.locate(Path::new("f.jpg")).await.is_empty());
    }

    #[tokio::test]
    async fn test_backend_error_degrades_to_empty() {
        let locator = FaceLocator::new(Arc::new(Broken));
        assert!(locator.locate(Path::new("f.jpg")).await.is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FaceDetectorConfig::default();
        assert_eq!(config.score_threshold, 0.6);
        assert_eq!(config.nms_threshold, 0.3);
        assert_eq!(config.top_k, 20);
    }

    #[test]
    fn test_detection_availability_follows_feature() {
        assert_eq!(face_detection_available(), cfg!(feature = "opencv"));
    }
}
