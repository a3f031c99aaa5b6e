//! Club-path plausibility scoring
//!
//! - Smoothness: `1 / (1 + var(v) / mean(v)²)`, the inverse of the normalized
//!   velocity variance
//! - Arc-height deviation: `|vertical range / body height - expected|`
//! - Continuity: accepted points / frames spanned
//! - Accuracy and confidence derived from the above and per-point confidences

use super::ClubPathPoint;
use crate::features::kinematics::{mean, variance};

/// Numerical stability epsilon
const EPSILON: f32 = 1e-6;

/// Quality scores of a club-head trajectory
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathQuality {
    /// Inverse normalized velocity variance in [0, 1]
    pub smoothness: f32,
    /// |relative vertical range - expected arc height|
    pub arc_height_deviation: f32,
    /// Accepted points / frames spanned in [0, 1]
    pub continuity: f32,
    /// Combined accuracy in [0, 1]
    pub accuracy: f32,
    /// Combined confidence in [0, 1]
    pub confidence: f32,
}

/// Score a trajectory
///
/// # Arguments
///
/// * `points` - Trajectory points with velocities already derived
/// * `body_height` - Nose-to-ankle height at address, if measurable
/// * `expected_arc_height` - Expected vertical range relative to body height
///
/// # Returns
///
/// All-zero quality for fewer than 2 points.
pub fn assess_path(
    points: &[ClubPathPoint],
    body_height: Option<f32>,
    expected_arc_height: f32,
) -> PathQuality {
    if points.len() < 2 {
        return PathQuality::default();
    }

    let velocities: Vec<f32> = points.iter().map(|p| p.velocity).collect();
    let mean_velocity = mean(&velocities);
    let smoothness = if mean_velocity > EPSILON {
        let normalized_variance = variance(&velocities) / (mean_velocity * mean_velocity);
        1.0 / (1.0 + normalized_variance)
    } else {
        // A motionless path carries no swing evidence
        0.0
    };

    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let scale = body_height.filter(|h| *h > EPSILON).unwrap_or(1.0);
    let arc_height_deviation = ((max_y - min_y) / scale - expected_arc_height).abs();

    let first = points[0].frame;
    let last = points[points.len() - 1].frame;
    let span = last.saturating_sub(first) + 1;
    let continuity = (points.len() as f32 / span as f32).clamp(0.0, 1.0);

    let mean_point_confidence =
        points.iter().map(|p| p.confidence).sum::<f32>() / points.len() as f32;

    let accuracy = (0.4 * smoothness
        + 0.3 * continuity
        + 0.3 * (1.0 - arc_height_deviation.min(1.0)))
    .clamp(0.0, 1.0);
    let confidence =
        (mean_point_confidence * (0.5 + 0.5 * smoothness) * continuity).clamp(0.0, 1.0);

    log::debug!(
        "Club path quality: smoothness={:.3}, arc_dev={:.3}, continuity={:.3}, accuracy={:.3}, confidence={:.3}",
        smoothness,
        arc_height_deviation,
        continuity,
        accuracy,
        confidence
    );

    PathQuality {
        smoothness,
        arc_height_deviation,
        continuity,
        accuracy,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(frames: &[usize], velocity: impl Fn(usize) -> f32) -> Vec<ClubPathPoint> {
        frames
            .iter()
            .enumerate()
            .map(|(k, &frame)| ClubPathPoint {
                x: 0.5,
                y: 0.2 + 0.01 * k as f32,
                z: 0.0,
                frame,
                timestamp_ms: frame as f32 * 33.3,
                velocity: velocity(k),
                confidence: 0.8,
            })
            .collect()
    }

    #[test]
    fn test_too_short_path_is_zero() {
        let q = assess_path(&path(&[3], |_| 1.0), Some(0.6), 1.0);
        assert_eq!(q, PathQuality::default());
    }

    #[test]
    fn test_constant_velocity_is_smooth() {
        let q = assess_path(&path(&[0, 1, 2, 3, 4], |_| 1.0), Some(0.6), 1.0);
        assert!((q.smoothness - 1.0).abs() < 1e-6);
        assert!((q.continuity - 1.0).abs() < 1e-6);
        assert!(q.confidence > 0.0 && q.confidence <= 1.0);
    }

    #[test]
    fn test_erratic_velocity_is_rough() {
        let smooth = assess_path(&path(&[0, 1, 2, 3], |_| 1.0), None, 1.0);
        let rough = assess_path(
            &path(&[0, 1, 2, 3], |k| if k % 2 == 0 { 0.1 } else { 3.0 }),
            None,
            1.0,
        );
        assert!(rough.smoothness < smooth.smoothness);
    }

    #[test]
    fn test_gaps_reduce_continuity() {
        let q = assess_path(&path(&[0, 5, 10], |_| 1.0), None, 1.0);
        assert!((q.continuity - 3.0 / 11.0).abs() < 1e-6);
    }
}
