//! Peak club-head dynamics
//!
//! Second difference of the club-head path. The head reverses its vertical
//! direction at the bottom of the arc, which produces the sharpest
//! acceleration spike of the swing.
//!
//! Confidence: `min(1, peak_acceleration / expected_peak_acceleration)`

use super::{ImpactMethod, MethodResult};
use crate::config::ImpactConfig;
use crate::error::AnalysisError;
use crate::features::club_path::ClubPath;
use crate::features::kinematics::{accelerations, argmax_in};

/// Estimate impact from peak club-head acceleration
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] for paths shorter than
/// `config.min_samples`.
pub fn detect(path: &ClubPath, config: &ImpactConfig) -> Result<MethodResult, AnalysisError> {
    if path.len() < config.min_samples {
        return Err(AnalysisError::insufficient(
            "peak dynamics",
            config.min_samples,
            path.len(),
        ));
    }

    let positions: Vec<_> = path.points.iter().map(|p| p.position()).collect();
    let stamps: Vec<f32> = path.points.iter().map(|p| p.timestamp_ms).collect();
    let acc = accelerations(&positions, &stamps);

    let peak = argmax_in(&acc, 1..acc.len().saturating_sub(1))
        .ok_or_else(|| AnalysisError::NumericalError("no finite club acceleration".to_string()))?;

    log::debug!(
        "Peak dynamics: {:.2} units/s² at frame {}",
        acc[peak],
        path.points[peak].frame
    );

    Ok(MethodResult {
        method: ImpactMethod::PeakDynamics,
        frame: path.points[peak].frame,
        confidence: (acc[peak] / config.expected_peak_acceleration.max(f32::EPSILON))
            .clamp(0.0, 1.0),
        raw_metric: acc[peak],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::club_path::ClubPathPoint;

    #[test]
    fn test_direction_reversal_is_peak() {
        // Falls steadily, then bounces back up at point 4
        let ys = [0.2, 0.3, 0.4, 0.5, 0.6, 0.5, 0.4];
        let path = ClubPath {
            points: ys
                .iter()
                .enumerate()
                .map(|(i, &y)| ClubPathPoint {
                    x: 0.5,
                    y,
                    z: 0.0,
                    frame: i + 10,
                    timestamp_ms: i as f32 * 33.3,
                    velocity: 0.0,
                    confidence: 0.9,
                })
                .collect(),
            ..ClubPath::default()
        };
        let r = detect(&path, &ImpactConfig::default()).unwrap();
        assert_eq!(r.frame, 14);
        assert!((r.confidence - 1.0).abs() < 1e-6);
    }
}
