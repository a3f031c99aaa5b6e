//! Timestamp resolution
//!
//! Priority: an explicit timestamp array supplied by the caller, then the
//! frames' own timestamps when they are strictly increasing, then a synthetic
//! constant-rate timeline at the configured frame rate.

use crate::error::AnalysisError;

use super::landmark::PoseFrame;

/// Resolve one timestamp (ms) per frame
///
/// # Errors
///
/// Returns [`AnalysisError::FatalInput`] when an explicit array has the wrong
/// length, contains non-finite values, or is not strictly increasing, or when
/// the fallback frame rate is not positive.
pub fn resolve_timestamps(
    frames: &[PoseFrame],
    explicit: Option<&[f32]>,
    default_fps: f32,
) -> Result<Vec<f32>, AnalysisError> {
    if let Some(ts) = explicit {
        if ts.len() != frames.len() {
            return Err(AnalysisError::FatalInput(format!(
                "Timestamp array length ({}) does not match frame count ({})",
                ts.len(),
                frames.len()
            )));
        }
        if !is_strictly_increasing(ts) {
            return Err(AnalysisError::FatalInput(
                "Timestamps must be finite and strictly increasing".to_string(),
            ));
        }
        return Ok(ts.to_vec());
    }

    let own: Vec<f32> = frames.iter().map(|f| f.timestamp_ms).collect();
    if frames.len() > 1 && is_strictly_increasing(&own) {
        return Ok(own);
    }

    if !(default_fps.is_finite() && default_fps > 0.0) {
        return Err(AnalysisError::FatalInput(format!(
            "Invalid fallback frame rate: {}",
            default_fps
        )));
    }

    if frames.len() > 1 {
        log::debug!(
            "Frame timestamps unusable, assuming constant {:.1} fps",
            default_fps
        );
    }

    let interval = 1000.0 / default_fps;
    let start = own.first().copied().filter(|t| t.is_finite()).unwrap_or(0.0);
    Ok((0..frames.len())
        .map(|i| start + i as f32 * interval)
        .collect())
}

/// Total capture duration `t[N-1] - t[0]` in ms
pub fn capture_duration_ms(timestamps: &[f32]) -> f32 {
    match (timestamps.first(), timestamps.last()) {
        (Some(first), Some(last)) => (last - first).max(0.0),
        _ => 0.0,
    }
}

/// Time between frames `a` and `b` in seconds (never zero)
pub fn delta_seconds(timestamps: &[f32], a: usize, b: usize) -> f32 {
    let dt_ms = match (timestamps.get(a), timestamps.get(b)) {
        (Some(ta), Some(tb)) => (tb - ta).abs(),
        _ => 0.0,
    };
    (dt_ms / 1000.0).max(1e-4)
}

fn is_strictly_increasing(ts: &[f32]) -> bool {
    ts.iter().all(|t| t.is_finite()) && ts.windows(2).all(|w| w[1] > w[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::landmark::{Landmark, LANDMARK_COUNT};

    fn frames(n: usize, stamp: impl Fn(usize) -> f32) -> Vec<PoseFrame> {
        (0..n)
            .map(|i| PoseFrame::new(stamp(i), vec![Landmark::default(); LANDMARK_COUNT]))
            .collect()
    }

    #[test]
    fn test_explicit_timestamps_win() {
        let f = frames(3, |i| i as f32 * 10.0);
        let ts = resolve_timestamps(&f, Some(&[0.0, 5.0, 12.0]), 30.0).unwrap();
        assert_eq!(ts, vec![0.0, 5.0, 12.0]);
    }

    #[test]
    fn test_explicit_length_mismatch_is_fatal() {
        let f = frames(3, |_| 0.0);
        let err = resolve_timestamps(&f, Some(&[0.0, 5.0]), 30.0).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_non_increasing_explicit_is_fatal() {
        let f = frames(3, |_| 0.0);
        assert!(resolve_timestamps(&f, Some(&[0.0, 5.0, 5.0]), 30.0).is_err());
    }

    #[test]
    fn test_frame_timestamps_used_when_increasing() {
        let f = frames(4, |i| 100.0 + i as f32 * 20.0);
        let ts = resolve_timestamps(&f, None, 30.0).unwrap();
        assert_eq!(ts, vec![100.0, 120.0, 140.0, 160.0]);
    }

    #[test]
    fn test_default_fps_fallback() {
        let f = frames(4, |_| 0.0);
        let ts = resolve_timestamps(&f, None, 30.0).unwrap();
        assert!((ts[3] - 100.0).abs() < 1e-3);
        assert!((capture_duration_ms(&ts) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_delta_seconds_never_zero() {
        let ts = vec![0.0, 0.0];
        assert!(delta_seconds(&ts, 0, 1) > 0.0);
        let ts = vec![0.0, 500.0];
        assert!((delta_seconds(&ts, 0, 1) - 0.5).abs() < 1e-6);
    }
}
