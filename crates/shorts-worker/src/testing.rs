//! In-memory port implementations for exercising the pipeline without external tools.

use async_trait::async_trait;
use shorts_media::{FaceDetector, FrameSampler, MediaError, MediaResult, Transcoder, VideoSource};
use shorts_models::{FaceBox, Resolution, Segment, SourceVideo};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Video source returning fixed metadata and writing a placeholder media file.
pub struct FakeSource {
    pub duration: f64,
    pub not_found: bool,
    pub downloads: AtomicUsize,
}

impl FakeSource {
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration,
            not_found: false,
            downloads: AtomicUsize::new(0),
        }
    }

    pub fn missing() -> Self {
        Self {
            not_found: true,
            ..Self::with_duration(0.0)
        }
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoSource for FakeSource {
    async fn fetch_info(&self, url: &str) -> MediaResult<SourceVideo> {
        if self.not_found {
            return Err(MediaError::NotFound(url.to_string()));
        }
        Ok(SourceVideo::new("fake123", "Fake video", self.duration))
    }

    async fn fetch_file(&self, _url: &str, video_id: &str, dir: &Path) -> MediaResult<PathBuf> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}.mp4", video_id));
        tokio::fs::write(&path, b"source").await?;
        Ok(path)
    }
}

/// Frame sampler writing empty frame files at a fixed resolution.
pub struct FakeSampler {
    pub resolution: Resolution,
}

impl Default for FakeSampler {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
        }
    }
}

#[async_trait]
impl FrameSampler for FakeSampler {
    async fn extract_frame(&self, _video: &Path, timestamp: f64, dir: &Path) -> MediaResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(shorts_media::frame::frame_file_name(timestamp));
        tokio::fs::write(&path, b"").await?;
        Ok(path)
    }

    async fn probe_resolution(&self, _video: &Path) -> MediaResult<Resolution> {
        Ok(self.resolution)
    }
}

/// Transcoder writing placeholder outputs, optionally failing on the n-th call (0-based).
#[derive(Default)]
pub struct FakeTranscoder {
    pub fail_on: Option<usize>,
    pub calls: Mutex<Vec<Segment>>,
}

impl FakeTranscoder {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(&self, _input: &Path, segment: Segment, output: &Path) -> MediaResult<()> {
        let call = {
            let mut calls = self
                .calls
                .lock()
                .map_err(|_| MediaError::internal("poisoned"))?;
            calls.push(segment);
            calls.len() - 1
        };
        if self.fail_on == Some(call) {
            return Err(MediaError::transcode_failed(
                "Conversion failed!",
                Some("Error while decoding stream #0:0".to_string()),
            ));
        }
        tokio::fs::write(output, b"short").await?;
        Ok(())
    }
}

/// Detector reporting the same faces in every frame, or always failing.
pub struct FakeDetector {
    pub faces: Vec<FaceBox>,
    pub fail: bool,
}

impl FakeDetector {
    /// One 100px face centered at relative height `y` of a 1080x1920 frame.
    pub fn face_at(y: f64) -> Self {
        Self {
            faces: vec![FaceBox::new(490.0, y * 1920.0 - 50.0, 100.0, 100.0)],
            fail: false,
        }
    }

    pub fn none() -> Self {
        Self {
            faces: Vec::new(),
            fail: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            faces: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl FaceDetector for FakeDetector {
    async fn detect(&self, _image: &Path) -> MediaResult<Vec<FaceBox>> {
        if self.fail {
            return Err(MediaError::model_not_found("yunet.onnx"));
        }
        Ok(self.faces.clone())
    }
}
