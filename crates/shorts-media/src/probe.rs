//! FFprobe video information.

use serde::{Deserialize, Serialize};
use shorts_models::Resolution;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::command::check_ffprobe;
use crate::error::{MediaError, MediaResult};

/// Video file information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Width in pixels, after display rotation
    pub width: u32,
    /// Height in pixels, after display rotation
    pub height: u32,
    /// Frame rate (fps)
    pub fps: f64,
    /// Video codec
    pub codec: String,
}

impl VideoInfo {
    /// Frame resolution of the first video stream.
    pub fn resolution(&self) -> MediaResult<Resolution> {
        if self.width == 0 || self.height == 0 {
            return Err(MediaError::InvalidVideo(format!(
                "video stream reports {}x{}",
                self.width, self.height
            )));
        }
        Ok(Resolution::new(self.width, self.height))
    }
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    #[serde(default)]
    tags: FfprobeTags,
    #[serde(default)]
    side_data_list: Vec<FfprobeSideData>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    rotate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeSideData {
    rotation: Option<f64>,
}

impl FfprobeStream {
    /// Display rotation in degrees, from the display matrix or the legacy `rotate` tag.
    fn rotation(&self) -> i64 {
        self.side_data_list
            .iter()
            .find_map(|sd| sd.rotation)
            .or_else(|| self.tags.rotate.as_ref().and_then(|r| r.trim().parse().ok()))
            .map(|r| r.round() as i64)
            .unwrap_or(0)
    }

    /// Width and height as decoded frames come out of ffmpeg (autorotated).
    fn display_dimensions(&self) -> (u32, u32) {
        let width = self.width.unwrap_or(0);
        let height = self.height.unwrap_or(0);
        if self.rotation().rem_euclid(180) == 90 {
            (height, width)
        } else {
            (width, height)
        }
    }
}

/// Probe a video file for information.
pub async fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    check_ffprobe()?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: "FFprobe failed".to_string(),
            stderr: Some(String::from_utf8_lossy(&output.stderr).to_string()),
        });
    }

    parse_probe_output(&output.stdout)
}

/// Parse ffprobe's `-print_format json` output.
fn parse_probe_output(stdout: &[u8]) -> MediaResult<VideoInfo> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::InvalidVideo("No video stream found".to_string()))?;

    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let fps = video_stream
        .avg_frame_rate
        .as_ref()
        .or(video_stream.r_frame_rate.as_ref())
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(30.0);

    let (width, height) = video_stream.display_dimensions();

    Ok(VideoInfo {
        duration,
        width,
        height,
        fps,
        codec: video_stream.codec_name.clone().unwrap_or_default(),
    })
}

/// Probe only the frame resolution of a video.
pub async fn probe_resolution(path: impl AsRef<Path>) -> MediaResult<Resolution> {
    probe_video(path).await?.resolution()
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    s.parse().ok()
}
