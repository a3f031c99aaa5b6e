//! Lowest club-head position
//!
//! Screen `y` grows downward, so the lowest head position is the largest `y`.
//! A path with more vertical variance has a more distinct low point.
//!
//! Confidence: `min(1, var(y) / expected_vertical_variance)`

use super::{ImpactMethod, MethodResult};
use crate::config::ImpactConfig;
use crate::error::AnalysisError;
use crate::features::club_path::ClubPath;
use crate::features::kinematics::{argmax_in, variance};

/// Estimate impact from the lowest club-head position
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] for paths shorter than
/// `config.min_samples`.
pub fn detect(path: &ClubPath, config: &ImpactConfig) -> Result<MethodResult, AnalysisError> {
    if path.len() < config.min_samples {
        return Err(AnalysisError::insufficient(
            "lowest club position",
            config.min_samples,
            path.len(),
        ));
    }

    let ys: Vec<f32> = path.points.iter().map(|p| p.y).collect();
    let lowest = argmax_in(&ys, 0..ys.len())
        .ok_or_else(|| AnalysisError::NumericalError("no finite club height".to_string()))?;
    let spread = variance(&ys);

    log::debug!(
        "Lowest club position: y={:.3} at frame {} (variance {:.4})",
        ys[lowest],
        path.points[lowest].frame,
        spread
    );

    Ok(MethodResult {
        method: ImpactMethod::LowestClubPosition,
        frame: path.points[lowest].frame,
        confidence: (spread / config.expected_vertical_variance.max(f32::EPSILON)).clamp(0.0, 1.0),
        raw_metric: spread,
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
                    frame: i * 2,
                    timestamp_ms: i as f32 * 66.0,
                    velocity: 0.0,
                    confidence: 0.9,
                })
                .collect(),
            ..ClubPath::default()
        }
    }

    #[test]
    fn test_largest_y_is_lowest() {
        let path = path_from_ys(&[0.5, 0.2, 0.1, 0.4, 0.9, 0.3]);
        let r = detect(&path, &ImpactConfig::default()).unwrap();
        // Point 4 sits on source frame 8
        assert_eq!(r.frame, 8);
        assert!((r.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_path_has_low_confidence() {
        let path = path_from_ys(&[0.5, 0.5, 0.501, 0.5, 0.5]);
        let r = detect(&path, &ImpactConfig::default()).unwrap();
        assert!(r.confidence < 0.01);
    }
}
