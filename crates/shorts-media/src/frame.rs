//! Still frame extraction.

use async_trait::async_trait;
use shorts_models::Resolution;
use std::path::{Path, PathBuf};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::ports::FrameSampler;
use crate::probe;

/// File name of the frame sampled at `timestamp` seconds.
pub fn frame_file_name(timestamp: f64) -> String {
    format!("frame_{:08}.jpg", (timestamp.max(0.0) * 1000.0).round() as u64)
}

/// [`FrameSampler`] backed by the ffmpeg and ffprobe CLIs.
#[derive(Debug, Clone, Default)]
pub struct FfmpegFrameSampler {
    runner: FfmpegRunner,
}

impl FfmpegFrameSampler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FrameSampler for FfmpegFrameSampler {
    async fn extract_frame(&self, video: &Path, timestamp: f64, dir: &Path) -> MediaResult<PathBuf> {
        if !video.exists() {
            return Err(MediaError::FileNotFound(video.to_path_buf()));
        }
        tokio::fs::create_dir_all(dir).await?;

        let output = dir.join(frame_file_name(timestamp));
        let cmd = FfmpegCommand::new(video, &output)
            .seek(timestamp)
            .single_frame()
            .output_arg("-q:v")
            .output_arg("2");

        self.runner.run(&cmd).await?;

        if !output.exists() {
            return Err(MediaError::internal(format!(
                "FFmpeg wrote no frame at {:.3}s",
                timestamp
            )));
        }
        Ok(output)
    }

    async fn probe_resolution(&self, video: &Path) -> MediaResult<Resolution> {
        probe::probe_resolution(video).await
    }
}
