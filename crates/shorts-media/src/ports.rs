//! Seams to the external tools the pipeline drives.
//!
//! Each trait has an FFmpeg / yt-dlp / OpenCV backed implementation in this crate,
//! and tests substitute in-memory fakes.

use async_trait::async_trait;
use shorts_models::{FaceBox, Resolution, Segment, SourceVideo};
use std::path::{Path, PathBuf};

use crate::error::MediaResult;

/// Resolves a URL to video metadata and a local media file.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetch id, title and duration without downloading media.
    ///
    /// Fails with `NotFound` when the URL does not resolve to a video and
    /// `Upstream` when the provider itself errors.
    async fn fetch_info(&self, url: &str) -> MediaResult<SourceVideo>;

    /// Download the media for `url` into `dir`, returning the file path.
    async fn fetch_file(&self, url: &str, video_id: &str, dir: &Path) -> MediaResult<PathBuf>;
}

/// Extracts still frames from a video file.
#[async_trait]
pub trait FrameSampler: Send + Sync {
    /// Write a single frame at `timestamp` seconds into `dir`, returning its path.
    async fn extract_frame(&self, video: &Path, timestamp: f64, dir: &Path) -> MediaResult<PathBuf>;

    /// Frame resolution of the video.
    async fn probe_resolution(&self, video: &Path) -> MediaResult<Resolution>;
}

/// Face-detection backend for a single still image.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Bounding boxes in the image's pixel coordinates. Empty means no face.
    async fn detect(&self, image: &Path) -> MediaResult<Vec<FaceBox>>;
}

/// Renders one segment of the source into a vertical short.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Write the reframed `segment` of `input` to `output`.
    async fn transcode(&self, input: &Path, segment: Segment, output: &Path) -> MediaResult<()>;
}
