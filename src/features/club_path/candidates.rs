//! Club-head position candidates
//!
//! Each candidate's confidence is the product of its contributing landmarks'
//! visibilities times a fixed method reliability weight
//! (geometric > biomechanical > swing-plane).

use serde::{Deserialize, Serialize};

use crate::config::{ClubPathConfig, Handedness};
use crate::error::AnalysisError;
use crate::pose::geometry::Point3;
use crate::pose::landmark::{BodySide, Joint, PoseFrame};

/// Candidate estimation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateMethod {
    /// Lead forearm extended by the club:arm length ratio
    GeometricArmExtension,
    /// Shoulder-center → grip-center extended by a torso factor
    BiomechanicalGrip,
    /// Elbow-center → grip-center extended by an arm-span factor
    SwingPlane,
}

/// One club-head position candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadCandidate {
    /// Method that produced this candidate
    pub method: CandidateMethod,
    /// Estimated club-head position
    pub position: Point3,
    /// Candidate confidence in [0, 1]
    pub confidence: f32,
}

/// Arm landmarks required by every candidate
struct ArmLandmarks {
    lead_shoulder: Point3,
    trail_shoulder: Point3,
    lead_elbow: Point3,
    trail_elbow: Point3,
    lead_wrist: Point3,
    trail_wrist: Point3,
    vis: [f32; 6],
}

impl ArmLandmarks {
    fn from_frame(
        frame: &PoseFrame,
        handedness: Handedness,
        min_visibility: f32,
    ) -> Result<Self, AnalysisError> {
        let lead = BodySide::lead(handedness);
        let trail = BodySide::trail(handedness);
        let joints = [
            (Joint::Shoulder, lead),
            (Joint::Shoulder, trail),
            (Joint::Elbow, lead),
            (Joint::Elbow, trail),
            (Joint::Wrist, lead),
            (Joint::Wrist, trail),
        ];

        let mut points = [Point3::default(); 6];
        let mut vis = [0.0f32; 6];
        for (slot, (joint, side)) in joints.iter().enumerate() {
            points[slot] = frame.joint(*joint, *side, min_visibility).ok_or_else(|| {
                AnalysisError::InvalidLandmarks(format!("{:?} {:?} not visible", side, joint))
            })?;
            vis[slot] = frame.visibility(joint.index(*side));
        }

        Ok(Self {
            lead_shoulder: points[0],
            trail_shoulder: points[1],
            lead_elbow: points[2],
            trail_elbow: points[3],
            lead_wrist: points[4],
            trail_wrist: points[5],
            vis,
        })
    }

    fn grip_center(&self) -> Point3 {
        self.lead_wrist.midpoint(self.trail_wrist)
    }
}

/// Compute all three club-head candidates for one frame
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidLandmarks`] when any shoulder, elbow, or
/// wrist is missing or below the visibility threshold; such frames become gaps
/// in the trajectory.
pub fn frame_candidates(
    frame: &PoseFrame,
    handedness: Handedness,
    min_visibility: f32,
    config: &ClubPathConfig,
) -> Result<[HeadCandidate; 3], AnalysisError> {
    let arms = ArmLandmarks::from_frame(frame, handedness, min_visibility)?;
    let [w_geo, w_bio, w_plane] = config.method_weights;
    let [ls, ts, le, te, lw, tw] = arms.vis;
    let grip = arms.grip_center();

    let geometric = HeadCandidate {
        method: CandidateMethod::GeometricArmExtension,
        position: arms
            .lead_wrist
            .extend_from(arms.lead_elbow, config.arm_extension_ratio),
        confidence: (le * lw * w_geo).clamp(0.0, 1.0),
    };

    let shoulder_center = arms.lead_shoulder.midpoint(arms.trail_shoulder);
    let biomechanical = HeadCandidate {
        method: CandidateMethod::BiomechanicalGrip,
        position: grip.extend_from(shoulder_center, config.torso_factor),
        confidence: (ls * ts * lw * tw * w_bio).clamp(0.0, 1.0),
    };

    let elbow_center = arms.lead_elbow.midpoint(arms.trail_elbow);
    let swing_plane = HeadCandidate {
        method: CandidateMethod::SwingPlane,
        position: grip.extend_from(elbow_center, config.arm_span_factor),
        confidence: (le * te * lw * tw * w_plane).clamp(0.0, 1.0),
    };

    Ok([geometric, biomechanical, swing_plane])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::landmark::index;
    use crate::pose::synthetic::SyntheticSwing;

    #[test]
    fn test_three_candidates_ordered_by_reliability() {
        let frames = SyntheticSwing::default().generate();
        let config = ClubPathConfig::default();
        let c = frame_candidates(&frames[100], Handedness::Right, 0.5, &config).unwrap();
        assert_eq!(c[0].method, CandidateMethod::GeometricArmExtension);
        assert!(c[0].confidence > c[1].confidence);
        assert!(c[1].confidence > c[2].confidence);
        assert!(c.iter().all(|h| h.position.is_finite()));
    }

    #[test]
    fn test_geometric_extends_forearm() {
        let frames = SyntheticSwing::default().generate();
        let config = ClubPathConfig::default();
        let frame = &frames[0];
        let c = frame_candidates(frame, Handedness::Right, 0.5, &config).unwrap();
        let wrist = frame.landmarks[index::LEFT_WRIST].point();
        let elbow = frame.landmarks[index::LEFT_ELBOW].point();
        let expected = wrist.add(wrist.sub(elbow).scale(2.3));
        assert!((c[0].position.x - expected.x).abs() < 1e-5);
        assert!((c[0].position.y - expected.y).abs() < 1e-5);
    }

    #[test]
    fn test_missing_elbow_is_invalid() {
        let frames = SyntheticSwing::default()
            .occlude(index::RIGHT_ELBOW, 0..5)
            .generate();
        let config = ClubPathConfig::default();
        let err = frame_candidates(&frames[2], Handedness::Right, 0.5, &config).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidLandmarks(_)));
        assert!(frame_candidates(&frames[6], Handedness::Right, 0.5, &config).is_ok());
    }
}
