#![deny(unreachable_patterns)]
//! Segment selection and vertical reframing over the FFmpeg CLI.
//!
//! This crate provides:
//! - Fixed-window segment planning and normalization
//! - Type-safe FFmpeg command building with progress parsing
//! - Scale + center-crop reframing to 1080x1920
//! - Caption-safe text placement from sampled face positions
//! - yt-dlp, FFprobe and YuNet adapters behind the traits in [`ports`]

pub mod caption;
pub mod command;
pub mod download;
pub mod error;
pub mod face;
pub mod frame;
pub mod ports;
pub mod probe;
pub mod progress;
pub mod reframe;
pub mod segment;

pub use caption::{CaptionConfig, TextPlacementEstimator};
pub use command::{check_ffmpeg, check_ffprobe, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::YtDlpSource;
pub use error::{MediaError, MediaResult};
pub use face::{face_detection_available, FaceDetectorConfig, FaceLocator, YuNetDetector};
pub use frame::FfmpegFrameSampler;
pub use ports::{FaceDetector, FrameSampler, Transcoder, VideoSource};
pub use probe::{probe_resolution, probe_video, VideoInfo};
pub use progress::FfmpegProgress;
pub use reframe::FfmpegTranscoder;
pub use segment::{normalize_segment, plan_segments, SegmentConfig};
