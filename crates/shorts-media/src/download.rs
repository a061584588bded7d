//! Video source over yt-dlp.

use async_trait::async_trait;
use serde::Deserialize;
use shorts_models::SourceVideo;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

use crate::command::check_ytdlp;
use crate::error::{MediaError, MediaResult};
use crate::ports::VideoSource;

/// Format selection preferring MP4/M4A so no re-mux is needed.
const FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// stderr fragments yt-dlp prints when a URL does not resolve to a video.
const NOT_FOUND_MARKERS: &[&str] = &[
    "Video unavailable",
    "Unsupported URL",
    "does not exist",
    "HTTP Error 404",
    "Private video",
    "This video has been removed",
];

/// Subset of `yt-dlp --dump-json` output.
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// [`VideoSource`] backed by the yt-dlp CLI.
#[derive(Debug, Clone, Default)]
pub struct YtDlpSource {
    extra_args: Vec<String>,
}

impl YtDlpSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra arguments passed to every yt-dlp invocation (e.g. `--cookies`).
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn fetch_info(&self, url: &str) -> MediaResult<SourceVideo> {
        check_ytdlp()?;

        let output = Command::new("yt-dlp")
            .args(["--dump-json", "--no-playlist", "--skip-download", "--no-warnings"])
            .args(&self.extra_args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(classify_failure(url, &stderr));
        }

        parse_info(&output.stdout)
    }

    async fn fetch_file(&self, url: &str, video_id: &str, dir: &Path) -> MediaResult<PathBuf> {
        let stem = SourceVideo::new(video_id, "", 0.0).file_stem();
        let output_path = dir.join(format!("{}.mp4", stem));

        if let Ok(metadata) = tokio::fs::metadata(&output_path).await {
            if metadata.len() > 0 {
                info!("Using existing video file: {}", output_path.display());
                return Ok(output_path);
            }
        }

        check_ytdlp()?;
        tokio::fs::create_dir_all(dir).await?;

        info!("Downloading video from {} to {}", url, output_path.display());
        let started = Instant::now();

        let output = Command::new("yt-dlp")
            .args(["--no-playlist", "--no-warnings", "--merge-output-format", "mp4"])
            .args(["-f", FORMAT_SELECTOR])
            .args(&self.extra_args)
            .arg("-o")
            .arg(&output_path)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            let error_msg = stderr.lines().last().unwrap_or("Unknown error");
            return Err(MediaError::download_failed(format!("yt-dlp failed: {}", error_msg)));
        }

        if !output_path.exists() {
            return Err(MediaError::download_failed("Output file not created"));
        }

        let elapsed = started.elapsed().as_secs_f64();
        metrics::histogram!("shorts_download_duration_seconds").record(elapsed);

        let file_size = tokio::fs::metadata(&output_path).await?.len();
        info!(
            output = %output_path.display(),
            size_mb = file_size as f64 / (1024.0 * 1024.0),
            elapsed_secs = elapsed,
            "Downloaded video successfully"
        );

        Ok(output_path)
    }
}

fn parse_info(stdout: &[u8]) -> MediaResult<SourceVideo> {
    // --dump-json prints one object per line; the first one is the video
    let first = stdout
        .split(|b| *b == b'\n')
        .find(|line| !line.iter().all(u8::is_ascii_whitespace))
        .ok_or_else(|| MediaError::Upstream("yt-dlp returned no metadata".to_string()))?;

    let info: YtDlpInfo = serde_json::from_slice(first)?;
    let duration = info
        .duration
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| MediaError::Upstream(format!("no duration reported for video {}", info.id)))?;

    Ok(SourceVideo::new(
        info.id.clone(),
        info.title.unwrap_or(info.id),
        duration,
    ))
}

fn classify_failure(url: &str, stderr: &str) -> MediaError {
    if NOT_FOUND_MARKERS.iter().any(|m| stderr.contains(m)) {
        return MediaError::NotFound(url.to_string());
    }
    let last = stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("Unknown error");
    MediaError::Upstream(format!("yt-dlp failed: {}", last))
}
