//! Video encoding configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "fast";
/// Default CRF (Constant Rate Factor)
pub const DEFAULT_CRF: u8 = 23;
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";
/// Encoder threads per transcode
pub const DEFAULT_THREADS: u8 = 2;

/// Video encoding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EncodingConfig {
    /// Video codec (e.g., "libx264")
    #[serde(default = "default_video_codec")]
    pub codec: String,

    /// Encoding preset (e.g., "fast", "medium")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant Rate Factor (quality, 0-51, lower is better)
    #[serde(default = "default_crf")]
    pub crf: u8,

    /// Audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Encoder thread cap
    #[serde(default = "default_threads")]
    pub threads: u8,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_crf() -> u8 {
    DEFAULT_CRF
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}
fn default_threads() -> u8 {
    DEFAULT_THREADS
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            crf: DEFAULT_CRF,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            threads: DEFAULT_THREADS,
        }
    }
}

impl EncodingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new config with updated thread cap (minimum 1).
    pub fn with_threads(mut self, threads: u8) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Returns a new config with updated CRF.
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf.min(51);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let config = EncodingConfig::default();
        assert_eq!(config.codec, "libx264");
        assert_eq!(config.preset, "fast");
        assert_eq!(config.audio_codec, "aac");
        assert_eq!(config.threads, 2);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EncodingConfig = serde_json::from_str(r#"{"crf": 20}"#).unwrap();
        assert_eq!(config.crf, 20);
        assert_eq!(config.preset, DEFAULT_PRESET);
    }

    #[test]
    fn test_builders_clamp() {
        let config = EncodingConfig::new().with_threads(0).with_crf(99);
        assert_eq!(config.threads, 1);
        assert_eq!(config.crf, 51);
    }
}
