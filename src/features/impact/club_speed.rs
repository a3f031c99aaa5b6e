//! Peak club-head speed
//!
//! Backward-difference speed of the club-head path; impact is the frame where
//! the head is fastest.
//!
//! Confidence: `min(1, max_speed / expected_max_speed)`

use super::{ImpactMethod, MethodResult};
use crate::config::ImpactConfig;
use crate::error::AnalysisError;
use crate::features::club_path::ClubPath;
use crate::features::kinematics::{argmax_in, speeds};

/// Estimate impact from peak club-head speed
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] for paths shorter than
/// `config.min_samples`, or [`AnalysisError::NumericalError`] when no finite
/// speed exists.
pub fn detect(path: &ClubPath, config: &ImpactConfig) -> Result<MethodResult, AnalysisError> {
    if path.len() < config.min_samples {
        return Err(AnalysisError::insufficient(
            "peak club speed",
            config.min_samples,
            path.len(),
        ));
    }

    let positions: Vec<_> = path.points.iter().map(|p| p.position()).collect();
    let stamps: Vec<f32> = path.points.iter().map(|p| p.timestamp_ms).collect();
    let v = speeds(&positions, &stamps);

    let peak = argmax_in(&v, 1..v.len())
        .ok_or_else(|| AnalysisError::NumericalError("no finite club speed".to_string()))?;
    let max_speed = v[peak];

    log::debug!(
        "Peak club speed: {:.3} units/s at frame {}",
        max_speed,
        path.points[peak].frame
    );

    Ok(MethodResult {
        method: ImpactMethod::PeakClubSpeed,
        frame: path.points[peak].frame,
        confidence: (max_speed / config.expected_max_speed.max(f32::EPSILON)).clamp(0.0, 1.0),
        raw_metric: max_speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::club_path::ClubPathPoint;

    fn path_from_ys(ys: &[f32]) -> ClubPath {
        ClubPath {
            points: ys
                .iter()
                .enumerate()
                .map(|(i, &y)| ClubPathPoint {
                    x: 0.5,
                    y,
                    z: 0.0,
                    frame: i,
                    timestamp_ms: i as f32 * 100.0,
                    velocity: 0.0,
                    confidence: 0.9,
                })
                .collect(),
            ..ClubPath::default()
        }
    }

    #[test]
    fn test_fastest_step_wins() {
        let path = path_from_ys(&[0.1, 0.11, 0.13, 0.43, 0.45, 0.46]);
        let r = detect(&path, &ImpactConfig::default()).unwrap();
        assert_eq!(r.frame, 3);
        // 0.30 units over 0.1 s
        assert!((r.raw_metric - 3.0).abs() < 1e-3);
        assert!((r.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_short_path_is_insufficient() {
        let path = path_from_ys(&[0.1, 0.2, 0.3]);
        let err = detect(&path, &ImpactConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }
}
