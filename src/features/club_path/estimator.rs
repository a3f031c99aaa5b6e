//! Club-path estimation pipeline
//!
//! # Algorithm
//!
//! 1. For every frame with valid shoulders, elbows and wrists, compute three
//!    club-head candidates (see [`super::candidates`])
//! 2. Merge candidates per axis with [`weighted_consensus`]; point confidence
//!    is the mean candidate confidence times the weakest axis agreement
//! 3. Frames lacking landmarks are skipped (gaps are never fabricated)
//! 4. Optionally recalibrate for the capture resolution
//! 5. Derive per-point velocity by central differences across neighbouring
//!    accepted points, scaled by their real time delta
//! 6. Score smoothness, arc height and continuity
//!
//! # Example
//!
//! ```
//! use stratum_swing::config::AnalysisConfig;
//! use stratum_swing::features::club_path::estimate_path;
//! use stratum_swing::pose::synthetic::SyntheticSwing;
//!
//! let swing = SyntheticSwing::default();
//! let frames = swing.generate();
//! let timestamps: Vec<f32> = frames.iter().map(|f| f.timestamp_ms).collect();
//! let path = estimate_path(&frames, &timestamps, None, &AnalysisConfig::default());
//! assert_eq!(path.len(), frames.len());
//! assert!(path.confidence > 0.0 && path.confidence <= 1.0);
//! ```

use super::calibration::calibrate;
use super::candidates::frame_candidates;
use super::validation::assess_path;
use super::{ClubPath, ClubPathPoint, VideoMeta};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::consensus::{weighted_consensus, Estimate};
use crate::pose::landmark::{index, BodySide, Joint, PoseFrame};
use crate::pose::timestamps::delta_seconds;

/// Estimate the club-head trajectory
///
/// # Arguments
///
/// * `frames` - Pose sequence
/// * `timestamps` - One timestamp (ms) per frame
/// * `video_meta` - Optional capture metadata for recalibration
/// * `config` - Analysis configuration
///
/// # Returns
///
/// A [`ClubPath`]; never fails. Paths with fewer than 2 points carry zero
/// accuracy and confidence, as do paths shorter than
/// `club_path.min_points_for_confidence`.
pub fn estimate_path(
    frames: &[PoseFrame],
    timestamps: &[f32],
    video_meta: Option<&VideoMeta>,
    config: &AnalysisConfig,
) -> ClubPath {
    log::debug!("Estimating club path over {} frames", frames.len());

    let path_config = &config.club_path;
    let mut points: Vec<ClubPathPoint> = Vec::with_capacity(frames.len());
    let mut skipped = 0usize;
    let mut notes = Vec::new();

    for (frame_idx, frame) in frames.iter().enumerate() {
        match merge_candidates(frame, config) {
            Ok((position, confidence)) => points.push(ClubPathPoint {
                x: position.0,
                y: position.1,
                z: position.2,
                frame: frame_idx,
                timestamp_ms: timestamps.get(frame_idx).copied().unwrap_or(frame.timestamp_ms),
                velocity: 0.0,
                confidence,
            }),
            Err(e) => {
                log::trace!("Frame {} skipped for club path: {}", frame_idx, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!(
            "Club path: {} of {} frames lack arm landmarks",
            skipped,
            frames.len()
        );
        notes.push(format!(
            "Invalid landmarks: {} of {} frames lack arm landmarks and were skipped",
            skipped,
            frames.len()
        ));
    }

    let calibration_used = match video_meta {
        Some(meta) => calibrate(&mut points, meta.resolution, path_config.reference_resolution),
        None => false,
    };
    if calibration_used {
        notes.push("Path recalibrated for capture resolution".to_string());
    }

    derive_velocities(&mut points, timestamps);

    let body_height = frames.iter().find_map(|f| body_height(f, config));
    let mut quality = assess_path(&points, body_height, path_config.expected_arc_height);

    if points.len() < 2 {
        notes.push(format!(
            "{}",
            AnalysisError::insufficient("club path", 2, points.len())
        ));
    } else if points.len() < path_config.min_points_for_confidence {
        notes.push(format!(
            "{}",
            AnalysisError::insufficient(
                "club path",
                path_config.min_points_for_confidence,
                points.len()
            )
        ));
        quality.accuracy = 0.0;
        quality.confidence = 0.0;
    }

    log::debug!(
        "Club path: {} points, accuracy={:.3}, confidence={:.3}",
        points.len(),
        quality.accuracy,
        quality.confidence
    );

    ClubPath {
        points,
        accuracy: quality.accuracy,
        confidence: quality.confidence,
        smoothness: quality.smoothness,
        arc_height_deviation: quality.arc_height_deviation,
        continuity: quality.continuity,
        calibration_used,
        skipped_frames: skipped,
        notes,
    }
}

/// Merge the three candidates of one frame into a position and confidence
fn merge_candidates(
    frame: &PoseFrame,
    config: &AnalysisConfig,
) -> Result<((f32, f32, f32), f32), AnalysisError> {
    let candidates = frame_candidates(
        frame,
        config.handedness,
        config.min_visibility,
        &config.club_path,
    )?;

    let axis = |component: fn(&crate::pose::geometry::Point3) -> f32| {
        let estimates: Vec<Estimate> = candidates
            .iter()
            .map(|c| Estimate::new(component(&c.position), c.confidence))
            .collect();
        weighted_consensus(&estimates)
            .ok_or_else(|| AnalysisError::NumericalError("non-finite club-head candidate".to_string()))
    };

    let cx = axis(|p| p.x)?;
    let cy = axis(|p| p.y)?;
    let cz = axis(|p| p.z)?;

    let agreement = cx.agreement.min(cy.agreement).min(cz.agreement);
    let confidence = (cx.mean_confidence * agreement).clamp(0.0, 1.0);
    Ok(((cx.value, cy.value, cz.value), confidence))
}

/// Central-difference speed across neighbouring accepted points
fn derive_velocities(points: &mut [ClubPathPoint], timestamps: &[f32]) {
    let n = points.len();
    if n < 2 {
        return;
    }
    let speeds: Vec<f32> = (0..n)
        .map(|k| {
            let (a, b) = if k == 0 {
                (0, 1)
            } else if k == n - 1 {
                (n - 2, n - 1)
            } else {
                (k - 1, k + 1)
            };
            let dt = delta_seconds(timestamps, points[a].frame, points[b].frame);
            points[b].position().distance_2d(points[a].position()) / dt
        })
        .collect();
    for (point, speed) in points.iter_mut().zip(speeds) {
        point.velocity = speed;
    }
}

/// Nose-to-ankle-center height, used to normalize the swing arc
fn body_height(frame: &PoseFrame, config: &AnalysisConfig) -> Option<f32> {
    let nose = frame.point(index::NOSE, config.min_visibility)?;
    let lead = frame.joint(Joint::Ankle, BodySide::Left, config.min_visibility)?;
    let trail = frame.joint(Joint::Ankle, BodySide::Right, config.min_visibility)?;
    let height = lead.midpoint(trail).y - nose.y;
    (height > 0.0).then_some(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Resolution;
    use crate::pose::synthetic::SyntheticSwing;

    fn stamps(frames: &[PoseFrame]) -> Vec<f32> {
        frames.iter().map(|f| f.timestamp_ms).collect()
    }

    #[test]
    fn test_full_path_from_clean_swing() {
        let frames = SyntheticSwing::default().generate();
        let path = estimate_path(&frames, &stamps(&frames), None, &AnalysisConfig::default());
        assert_eq!(path.len(), 150);
        assert_eq!(path.skipped_frames, 0);
        assert!(path.points.windows(2).all(|w| w[1].frame > w[0].frame));
        assert!(path.confidence > 0.0 && path.confidence <= 1.0);
        assert!(path.accuracy > 0.0 && path.accuracy <= 1.0);
        assert!(!path.calibration_used);
    }

    #[test]
    fn test_gaps_are_not_fabricated() {
        let frames = SyntheticSwing::default()
            .occlude(index::LEFT_WRIST, 40..50)
            .generate();
        let path = estimate_path(&frames, &stamps(&frames), None, &AnalysisConfig::default());
        assert_eq!(path.len(), 140);
        assert_eq!(path.skipped_frames, 10);
        assert!(path.point_at(45).is_none());
        assert!(path.point_at(50).is_some());
        assert!(path.continuity < 1.0);
        assert!(path.notes.iter().any(|n| n.contains("Invalid landmarks")));
    }

    #[test]
    fn test_velocity_peaks_in_downswing() {
        let swing = SyntheticSwing::default();
        let frames = swing.generate();
        let path = estimate_path(&frames, &stamps(&frames), None, &AnalysisConfig::default());
        let fastest = path
            .points
            .iter()
            .max_by(|a, b| a.velocity.partial_cmp(&b.velocity).unwrap())
            .unwrap();
        let keys = swing.key_frames();
        assert!(fastest.frame > keys.top && fastest.frame <= keys.impact + 3);
    }

    #[test]
    fn test_short_path_reports_zero_confidence() {
        let frames = SyntheticSwing::with_frames(3).generate();
        let path = estimate_path(&frames, &stamps(&frames), None, &AnalysisConfig::default());
        assert_eq!(path.len(), 3);
        assert_eq!(path.confidence, 0.0);
        assert_eq!(path.accuracy, 0.0);
        assert!(path.notes.iter().any(|n| n.contains("Insufficient data")));
    }

    #[test]
    fn test_single_point_path() {
        let frames = SyntheticSwing::with_frames(1).generate();
        let path = estimate_path(&frames, &stamps(&frames), None, &AnalysisConfig::default());
        assert_eq!(path.len(), 1);
        assert_eq!(path.confidence, 0.0);
        assert_eq!(path.points[0].velocity, 0.0);
    }

    #[test]
    fn test_calibration_flag() {
        let frames = SyntheticSwing::default().generate();
        let meta = VideoMeta {
            resolution: Resolution { width: 1080, height: 1920 },
        };
        let path = estimate_path(&frames, &stamps(&frames), Some(&meta), &AnalysisConfig::default());
        assert!(path.calibration_used);
    }

    #[test]
    fn test_smaller_capture_is_recalibrated() {
        let frames = SyntheticSwing::default().generate();
        let config = AnalysisConfig::default();
        let plain = estimate_path(&frames, &stamps(&frames), None, &config);
        let meta = VideoMeta {
            resolution: Resolution { width: 1280, height: 720 },
        };
        let path = estimate_path(&frames, &stamps(&frames), Some(&meta), &config);
        assert!(path.calibration_used);
        assert_eq!(path.len(), plain.len());
        let (a, b) = (&plain.points[0], &path.points[0]);
        assert!((b.x - a.x * 2.0 / 3.0).abs() < 1e-4);
        assert!((b.y - a.y * 2.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_reference_capture_is_not_recalibrated() {
        let frames = SyntheticSwing::default().generate();
        let meta = VideoMeta {
            resolution: Resolution { width: 1920, height: 1080 },
        };
        let path = estimate_path(&frames, &stamps(&frames), Some(&meta), &AnalysisConfig::default());
        assert!(!path.calibration_used);
    }
}
