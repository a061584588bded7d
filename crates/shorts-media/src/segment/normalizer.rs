use shorts_models::Segment;
use tracing::warn;

use super::SegmentConfig;

/// Clamp a candidate segment into `[0, duration]`, widening it to the minimum length.
///
/// Steps, applied in order:
/// 1. `start = max(0, start)`, `end = min(end, duration)`
/// 2. if shorter than the minimum, extend the end up to the video length
/// 3. if still shorter, pull the start back towards 0
///
/// The maximum length is not enforced here; an over-long result is only logged.
pub fn normalize_segment(segment: Segment, duration: f64, config: &SegmentConfig) -> Segment {
    let min = config.min_short_length;

    let mut start = segment.start.max(0.0);
    let mut end = segment.end.min(duration);

    if end - start < min {
        end = (start + min).min(duration);
    }
    if end - start < min {
        start = (end - min).max(0.0);
    }

    let normalized = Segment::new(start, end);
    if normalized.duration() > config.max_short_length {
        warn!(
            segment = %normalized,
            max = config.max_short_length,
            "Normalized segment exceeds maximum short length"
        );
    }
    normalized
}
