//! Vertical reframe of a segment through FFmpeg.

use async_trait::async_trait;
use shorts_models::{EncodingConfig, ReframeSpec, Segment};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::ports::Transcoder;

/// Build the FFmpeg command rendering `segment` of `input` as a vertical short.
pub fn build_reframe_command(
    input: &Path,
    segment: Segment,
    output: &Path,
    reframe: &ReframeSpec,
    encoding: &EncodingConfig,
) -> FfmpegCommand {
    FfmpegCommand::new(input, output)
        .seek(segment.start)
        .duration(segment.duration())
        .video_filter(reframe.video_filter())
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .threads(encoding.threads)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
        .faststart()
}

/// [`Transcoder`] backed by the ffmpeg CLI.
#[derive(Debug, Clone, Default)]
pub struct FfmpegTranscoder {
    reframe: ReframeSpec,
    encoding: EncodingConfig,
    runner: FfmpegRunner,
}

impl FfmpegTranscoder {
    pub fn new(encoding: EncodingConfig) -> Self {
        Self {
            reframe: ReframeSpec::vertical(),
            encoding,
            runner: FfmpegRunner::new(),
        }
    }

    /// Kill FFmpeg when a single transcode runs longer than `secs`.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.runner = self.runner.with_timeout(secs);
        self
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, segment: Segment, output: &Path) -> MediaResult<()> {
        if !input.exists() {
            return Err(MediaError::transcode_failed(
                format!("input file not found: {}", input.display()),
                None,
            ));
        }
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let cmd = build_reframe_command(input, segment, output, &self.reframe, &self.encoding);
        let total_ms = (segment.duration() * 1000.0) as i64;
        let started = Instant::now();

        info!(segment = %segment, output = %output.display(), "Reframing segment");

        self.runner
            .run_with_progress(&cmd, move |p| {
                debug!(percent = p.percentage(total_ms), speed = p.speed, "Transcode progress");
            })
            .await
            .map_err(|e| match e {
                MediaError::FfmpegFailed { message, stderr, .. } => {
                    MediaError::transcode_failed(message, stderr)
                }
                other => MediaError::transcode_failed(other.to_string(), None),
            })?;

        let elapsed = started.elapsed().as_secs_f64();
        metrics::histogram!("shorts_transcode_duration_seconds").record(elapsed);
        info!(segment = %segment, elapsed_secs = elapsed, "Segment reframed");
        Ok(())
    }
}
