//! YuNet face detector via OpenCV's FaceDetectorYN.
//!
//! Built only with the `opencv` feature. Without it every detection reports an
//! error, which the locator turns into "no faces".

use async_trait::async_trait;
use shorts_models::FaceBox;
use std::path::Path;

use super::FaceDetectorConfig;
use crate::error::{MediaError, MediaResult};
use crate::ports::FaceDetector;

/// Columns per YuNet output row:
/// [x, y, w, h, x_re, y_re, x_le, y_le, x_n, y_n, x_ml, y_ml, x_mr, y_mr, score]
const ROW_COLUMNS: usize = 15;
const SCORE_COLUMN: usize = 14;

/// Convert one YuNet output row into a box, dropping degenerate or low-score rows.
pub fn face_box_from_row(row: &[f32], score_threshold: f32) -> Option<FaceBox> {
    if row.len() < ROW_COLUMNS {
        return None;
    }
    let (x, y, w, h) = (row[0] as f64, row[1] as f64, row[2] as f64, row[3] as f64);
    if w <= 0.0 || h <= 0.0 || row[SCORE_COLUMN] < score_threshold {
        return None;
    }
    Some(FaceBox::new(x, y, w, h))
}

/// YuNet backed [`FaceDetector`].
#[derive(Debug, Clone)]
pub struct YuNetDetector {
    config: FaceDetectorConfig,
}

impl YuNetDetector {
    pub fn new(config: FaceDetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FaceDetectorConfig {
        &self.config
    }
}

#[async_trait]
impl FaceDetector for YuNetDetector {
    async fn detect(&self, image: &Path) -> MediaResult<Vec<FaceBox>> {
        if !self.config.model_path.exists() {
            return Err(MediaError::model_not_found(
                self.config.model_path.display().to_string(),
            ));
        }
        let config = self.config.clone();
        let image = image.to_path_buf();
        tokio::task::spawn_blocking(move || detect_blocking(&config, &image))
            .await
            .map_err(|e| MediaError::internal(format!("detection task panicked: {}", e)))?
    }
}

#[cfg(feature = "opencv")]
fn detect_blocking(config: &FaceDetectorConfig, image: &Path) -> MediaResult<Vec<FaceBox>> {
    use opencv::core::{Mat, Size};
    use opencv::dnn::{DNN_BACKEND_DEFAULT, DNN_TARGET_CPU};
    use opencv::imgcodecs;
    use opencv::objdetect::FaceDetectorYN;
    use opencv::prelude::{FaceDetectorYNTrait, MatTraitConst};

    let cv_err = |e: opencv::Error| MediaError::detection_failed(e.to_string());

    let image_path = image.to_string_lossy();
    let frame = imgcodecs::imread(&image_path, imgcodecs::IMREAD_COLOR).map_err(cv_err)?;
    if frame.empty() || frame.cols() <= 0 || frame.rows() <= 0 {
        return Err(MediaError::detection_failed(format!(
            "unreadable image: {}",
            image.display()
        )));
    }

    let input_size = Size::new(frame.cols(), frame.rows());
    let model_path = config.model_path.to_string_lossy();
    let mut detector = FaceDetectorYN::create(
        &model_path,
        "",
        input_size,
        config.score_threshold,
        config.nms_threshold,
        config.top_k,
        DNN_BACKEND_DEFAULT,
        DNN_TARGET_CPU,
    )
    .map_err(cv_err)?;
    detector.set_input_size(input_size).map_err(cv_err)?;

    let mut faces = Mat::default();
    detector.detect(&frame, &mut faces).map_err(cv_err)?;

    let cols = faces.cols().max(0) as usize;
    let mut results = Vec::with_capacity(faces.rows().max(0) as usize);
    for i in 0..faces.rows() {
        let mut row = Vec::with_capacity(cols);
        for j in 0..cols as i32 {
            row.push(*faces.at_2d::<f32>(i, j).map_err(cv_err)?);
        }
        if let Some(face) = face_box_from_row(&row, config.score_threshold) {
            results.push(face);
        }
    }

    tracing::debug!(
        image = %image.display(),
        candidates = faces.rows(),
        kept = results.len(),
        "YuNet detection"
    );
    Ok(results)
}

#[cfg(not(feature = "opencv"))]
fn detect_blocking(_config: &FaceDetectorConfig, _image: &Path) -> MediaResult<Vec<FaceBox>> {
    Err(MediaError::detection_failed("OpenCV feature not enabled"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f32, y: f32, w: f32, h: f32, score: f32) -> Vec<f32> {
        let mut r = vec![x, y, w, h];
        r.extend([0.0; 10]);
        r.push(score);
        r
    }

    #[test]
    fn test_row_to_box() {
        let face = face_box_from_row(&row(10.0, 20.0, 30.0, 40.0, 0.9), 0.6).unwrap();
        assert_eq!(face, FaceBox::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_low_score_and_degenerate_rows_dropped() {
        assert!(face_box_from_row(&row(10.0, 20.0, 30.0, 40.0, 0.5), 0.6).is_none());
        assert!(face_box_from_row(&row(10.0, 20.0, 0.0, 40.0, 0.9), 0.6).is_none());
        assert!(face_box_from_row(&[1.0, 2.0, 3.0], 0.6).is_none());
    }

    #[tokio::test]
    async fn test_missing_model_is_error() {
        let detector = YuNetDetector::new(
            FaceDetectorConfig::default().with_model_path("/nonexistent/yunet.onnx"),
        );
        let result = detector.detect(Path::new("frame.jpg")).await;
        assert!(matches!(result, Err(MediaError::ModelNotFound(_))));
    }
}
