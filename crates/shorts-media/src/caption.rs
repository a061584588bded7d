//! Caption-safe text placement from sampled face positions.

use shorts_models::{RelativeFacePosition, Resolution, TextPlacement};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::MediaResult;
use crate::face::FaceLocator;
use crate::ports::FrameSampler;

/// Maximum frames sampled per segment.
pub const DEFAULT_MAX_SAMPLES: u32 = 5;

/// Estimator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionConfig {
    pub max_samples: u32,
    /// Resolution assumed when the video cannot be probed.
    pub default_resolution: Resolution,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            max_samples: DEFAULT_MAX_SAMPLES,
            default_resolution: Resolution::default(),
        }
    }
}

/// Number of frames to sample from a segment of `duration` seconds.
///
/// One per whole second, capped at `max_samples`. NaN and negative durations sample nothing.
pub fn sample_count(duration: f64, max_samples: u32) -> u32 {
    if duration.is_nan() || duration < 1.0 {
        return 0;
    }
    duration.floor().min(max_samples as f64) as u32
}

/// Evenly spaced sample timestamps `start + i * duration / n` for `i in 0..n`.
pub fn sample_timestamps(start: f64, duration: f64, n: u32) -> Vec<f64> {
    (0..n)
        .map(|i| start + i as f64 * duration / n as f64)
        .collect()
}

/// Average the collected vertical positions into a placement.
pub fn placement_from_positions(ys: &[f64]) -> TextPlacement {
    if ys.is_empty() {
        return TextPlacement::fallback();
    }
    let avg = ys.iter().sum::<f64>() / ys.len() as f64;
    TextPlacement::from_average_face_y(avg)
}

/// Estimates where captions can go without covering faces.
#[derive(Clone)]
pub struct TextPlacementEstimator {
    sampler: Arc<dyn FrameSampler>,
    locator: FaceLocator,
    config: CaptionConfig,
    frames_dir: PathBuf,
}

impl TextPlacementEstimator {
    pub fn new(sampler: Arc<dyn FrameSampler>, locator: FaceLocator, config: CaptionConfig) -> Self {
        Self {
            sampler,
            locator,
            config,
            frames_dir: std::env::temp_dir().join("shorts-frames"),
        }
    }

    /// Directory sampled frames are written to.
    pub fn with_frames_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.frames_dir = dir.into();
        self
    }

    /// Placement for the segment starting at `segment_start`.
    ///
    /// Never fails: any sampling error yields the fallback placement.
    pub async fn estimate(&self, video: &Path, segment_start: f64, segment_duration: f64) -> TextPlacement {
        match self.try_estimate(video, segment_start, segment_duration).await {
            Ok(placement) => placement,
            Err(e) => {
                warn!(
                    video = %video.display(),
                    segment_start,
                    error = %e,
                    "Text placement estimation failed, using fallback"
                );
                metrics::counter!("shorts_caption_fallbacks_total", "reason" => "error").increment(1);
                TextPlacement::fallback()
            }
        }
    }

    async fn try_estimate(&self, video: &Path, start: f64, duration: f64) -> MediaResult<TextPlacement> {
        let n = sample_count(duration, self.config.max_samples);
        if n == 0 {
            debug!(duration, "Segment too short to sample");
            metrics::counter!("shorts_caption_fallbacks_total", "reason" => "no_samples").increment(1);
            return Ok(TextPlacement::fallback());
        }

        let resolution = match self.sampler.probe_resolution(video).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Could not probe resolution, assuming {}x{}",
                    self.config.default_resolution.width, self.config.default_resolution.height);
                self.config.default_resolution
            }
        };

        let mut ys = Vec::new();
        for timestamp in sample_timestamps(start, duration, n) {
            let frame = self
                .sampler
                .extract_frame(video, timestamp, &self.frames_dir)
                .await?;
            let faces = self.locator.locate(&frame).await;
            remove_frame(&frame).await;

            for face in faces {
                match RelativeFacePosition::from_face_box(&face, resolution) {
                    Ok(pos) => ys.push(pos.y),
                    Err(e) => warn!(timestamp, error = %e, "Discarding face outside frame"),
                }
            }
        }

        if ys.is_empty() {
            metrics::counter!("shorts_caption_fallbacks_total", "reason" => "no_faces").increment(1);
        }
        let placement = placement_from_positions(&ys);
        debug!(samples = n, faces = ys.len(), placement = placement.value(), "Estimated text placement");
        Ok(placement)
    }
}

async fn remove_frame(frame: &Path) {
    if let Err(e) = tokio::fs::remove_file(frame).await {
        warn!(frame = %frame.display(), error = %e, "Failed to remove sampled frame");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use crate::ports::FaceDetector;
    use async_trait::async_trait;
    use shorts_models::FaceBox;
    use std::sync::Mutex;

    /// Writes an empty file per frame and records the timestamps asked for.
    struct FakeSampler {
        resolution: Option<Resolution>,
        fail_at: Option<usize>,
        calls: Mutex<Vec<f64>>,
    }

    impl FakeSampler {
        fn new(resolution: Option<Resolution>) -> Self {
            Self {
                resolution,
                fail_at: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FrameSampler for FakeSampler {
        async fn extract_frame(&self, _video: &Path, timestamp: f64, dir: &Path) -> MediaResult<PathBuf> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(timestamp);
                calls.len() - 1
            };
            if self.fail_at == Some(index) {
                return Err(MediaError::ffmpeg_failed("seek past end", None, Some(1)));
            }
            let path = dir.join(crate::frame::frame_file_name(timestamp));
            tokio::fs::write(&path, b"").await?;
            Ok(path)
        }

        async fn probe_resolution(&self, video: &Path) -> MediaResult<Resolution> {
            self.resolution
                .ok_or_else(|| MediaError::FileNotFound(video.to_path_buf()))
        }
    }

    /// Returns the same faces for every frame.
    struct FakeDetector(Vec<FaceBox>);

    #[async_trait]
    impl FaceDetector for FakeDetector {
        async fn detect(&self, _image: &Path) -> MediaResult<Vec<FaceBox>> {
            Ok(self.0.clone())
        }
    }

    fn estimator(
        sampler: Arc<FakeSampler>,
        faces: Vec<FaceBox>,
        dir: &Path,
    ) -> TextPlacementEstimator {
        let locator = FaceLocator::new(Arc::new(FakeDetector(faces)));
        TextPlacementEstimator::new(sampler, locator, CaptionConfig::default()).with_frames_dir(dir)
    }

    /// A 100px face centered at relative y in a 1080x1920 frame.
    fn face_at(y: f64) -> FaceBox {
        FaceBox::new(490.0, y * 1920.0 - 50.0, 100.0, 100.0)
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_count(30.0, 5), 5);
        assert_eq!(sample_count(3.7, 5), 3);
        assert_eq!(sample_count(0.5, 5), 0);
        assert_eq!(sample_count(-2.0, 5), 0);
        assert_eq!(sample_count(f64::NAN, 5), 0);
    }

    #[test]
    fn test_sample_timestamps() {
        assert_eq!(sample_timestamps(30.0, 30.0, 5), vec![30.0, 36.0, 42.0, 48.0, 54.0]);
        assert!(sample_timestamps(0.0, 30.0, 0).is_empty());
    }

    #[test]
    fn test_placement_from_positions() {
        assert_eq!(placement_from_positions(&[]), TextPlacement::fallback());
        assert!((placement_from_positions(&[0.9, 0.9]).value() - 0.75).abs() < 1e-9);
        assert_eq!(placement_from_positions(&[0.1, 0.3]).value(), 0.7);
    }

    #[tokio::test]
    async fn test_faces_near_bottom() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = Arc::new(FakeSampler::new(Some(Resolution::new(1080, 1920))));
        let placement = estimator(sampler.clone(), vec![face_at(0.9)], dir.path())
            .estimate(Path::new("v.mp4"), 0.0, 30.0)
            .await;

        assert!((placement.value() - 0.75).abs() < 1e-6);
        assert_eq!(sampler.calls.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_no_faces_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = Arc::new(FakeSampler::new(Some(Resolution::new(1080, 1920))));
        let placement = estimator(sampler, Vec::new(), dir.path())
            .estimate(Path::new("v.mp4"), 0.0, 30.0)
            .await;
        assert_eq!(placement.value(), 0.83);
    }

    #[tokio::test]
    async fn test_frames_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = Arc::new(FakeSampler::new(Some(Resolution::new(1080, 1920))));
        estimator(sampler, vec![face_at(0.5)], dir.path())
            .estimate(Path::new("v.mp4"), 30.0, 30.0)
            .await;

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_extraction_failure_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut sampler = FakeSampler::new(Some(Resolution::new(1080, 1920)));
        sampler.fail_at = Some(2);
        let placement = estimator(Arc::new(sampler), vec![face_at(0.9)], dir.path())
            .estimate(Path::new("v.mp4"), 0.0, 30.0)
            .await;
        assert_eq!(placement, TextPlacement::fallback());
    }

    #[tokio::test]
    async fn test_probe_failure_assumes_vertical_frame() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = Arc::new(FakeSampler::new(None));
        let placement = estimator(sampler, vec![face_at(0.9)], dir.path())
            .estimate(Path::new("v.mp4"), 0.0, 30.0)
            .await;
        assert!((placement.value() - 0.75).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_out_of_frame_faces_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = Arc::new(FakeSampler::new(Some(Resolution::new(1080, 1920))));
        // Second face is centered below the frame
        let faces = vec![face_at(0.9), FaceBox::new(0.0, 2500.0, 100.0, 100.0)];
        let placement = estimator(sampler, faces, dir.path())
            .estimate(Path::new("v.mp4"), 0.0, 30.0)
            .await;
        assert!((placement.value() - 0.75).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_subsecond_segment_skips_sampling() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = Arc::new(FakeSampler::new(Some(Resolution::new(1080, 1920))));
        let placement = estimator(sampler.clone(), vec![face_at(0.5)], dir.path())
            .estimate(Path::new("v.mp4"), 0.0, 0.4)
            .await;
        assert_eq!(placement, TextPlacement::fallback());
        assert!(sampler.calls.lock().unwrap().is_empty());
    }
}
