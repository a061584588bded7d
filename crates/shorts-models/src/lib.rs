//! Shared data models for the shorts pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Segments (time windows of a source video)
//! - Face boxes and relative face positions
//! - Caption-safe text placement
//! - Reframe and encoding parameters
//! - Jobs and their status records

pub mod encoding;
pub mod error;
pub mod face;
pub mod job;
pub mod placement;
pub mod reframe;
pub mod segment;
pub mod video;

// Re-export common types
pub use encoding::EncodingConfig;
pub use error::{ModelError, ModelResult};
pub use face::{FaceBox, RelativeFacePosition, Resolution};
pub use job::{JobId, JobRecord, JobStatus, ShortClip};
pub use placement::TextPlacement;
pub use reframe::ReframeSpec;
pub use segment::Segment;
pub use video::SourceVideo;
