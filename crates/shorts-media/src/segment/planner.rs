use shorts_models::Segment;
use tracing::debug;

use super::SegmentConfig;
use crate::error::{MediaError, MediaResult};

/// Plan the fixed windows of a video.
///
/// Windows are `min_short_length` long and laid back to back from 0. A window is
/// emitted only when the video covers its full nominal length, and no window may
/// end past `max_short_length`. With the default config this yields `[0, 30)` for
/// any video of at least 30s, plus `[30, 60)` once the video reaches 60s.
pub fn plan_segments(duration: f64, config: &SegmentConfig) -> MediaResult<Vec<Segment>> {
    let min = config.min_short_length;

    if duration < min {
        return Err(MediaError::InsufficientDuration {
            duration,
            minimum: min,
        });
    }

    let mut segments = Vec::new();
    if min > 0.0 {
        let mut start = 0.0;
        loop {
            let nominal_end = start + min;
            if nominal_end > config.max_short_length || duration.is_nan() || duration < nominal_end {
                break;
            }
            segments.push(Segment::new(start, nominal_end.min(duration)));
            start = nominal_end;
        }
    }

    if segments.is_empty() {
        return Err(MediaError::NoSegments { duration });
    }

    debug!(duration, count = segments.len(), "Planned segments");
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(duration: f64) -> MediaResult<Vec<Segment>> {
        plan_segments(duration, &SegmentConfig::default())
    }

    #[test]
    fn test_single_window_below_sixty() {
        for d in [30.0, 45.0, 59.99] {
            assert_eq!(plan(d).unwrap(), vec![Segment::new(0.0, 30.0)], "duration {}", d);
        }
    }

    #[test]
    fn test_two_windows_from_sixty() {
        for d in [60.0, 61.0, 3600.0] {
            assert_eq!(
                plan(d).unwrap(),
                vec![Segment::new(0.0, 30.0), Segment::new(30.0, 60.0)],
                "duration {}",
                d
            );
        }
    }

    #[test]
    fn test_too_short_is_rejected() {
        for d in [0.0, 12.5, 29.999, -4.0] {
            assert!(
                matches!(plan(d), Err(MediaError::InsufficientDuration { .. })),
                "duration {}",
                d
            );
        }
    }

    #[test]
    fn test_nan_plans_nothing() {
        assert!(matches!(plan(f64::NAN), Err(MediaError::NoSegments { .. })));
    }

    #[test]
    fn test_windows_never_end_past_max() {
        for d in [30.0, 75.0, 90.0, 10_000.0] {
            let segments = plan(d).unwrap();
            assert!(segments.len() <= 2);
            for s in segments {
                assert!(s.end <= 60.0);
                assert!(s.start >= 0.0 && s.start < s.end && s.end <= d);
            }
        }
    }

    #[test]
    fn test_custom_config() {
        let config = SegmentConfig {
            min_short_length: 15.0,
            max_short_length: 45.0,
        };
        let segments = plan_segments(100.0, &config).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::new(0.0, 15.0),
                Segment::new(15.0, 30.0),
                Segment::new(30.0, 45.0)
            ]
        );
    }
}
