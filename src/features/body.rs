//! Per-frame body measurements
//!
//! Rotation is the turn of the trail→lead shoulder (or hip) line in the
//! top-down x–z plane relative to a reference heading, usually address. Weight
//! distribution is where the hip center sits between the ankles along x.
//! Every measurement is `None` when a required landmark is not usable.

use crate::config::Handedness;
use crate::pose::geometry::{
    heading_difference_deg, heading_xz_deg, joint_angle_3d_deg, tilt_from_vertical_deg, Point3,
    EPSILON,
};
use crate::pose::landmark::{index, BodySide, Joint, PoseFrame};

/// Body measurements taken from one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyMeasures {
    /// Heading of the trail→lead shoulder line in the x–z plane (degrees)
    pub shoulder_heading: Option<f32>,
    /// Heading of the trail→lead hip line in the x–z plane (degrees)
    pub hip_heading: Option<f32>,
    /// Share of weight on the lead side, in percent
    pub lead_weight_pct: Option<f32>,
    /// Lateral tilt of the hip-center→shoulder-center line (degrees)
    pub spine_tilt_deg: Option<f32>,
    /// Lead knee flex, 180° minus the hip-knee-ankle angle (degrees)
    pub knee_flex_deg: Option<f32>,
    /// Nose position
    pub head: Option<Point3>,
    /// Image-plane shoulder width
    pub shoulder_width: Option<f32>,
    /// Image-plane ankle separation
    pub stance_width: Option<f32>,
}

impl BodyMeasures {
    /// Measure one frame
    pub fn from_frame(frame: &PoseFrame, handedness: Handedness, min_visibility: f32) -> Self {
        let lead = BodySide::lead(handedness);
        let trail = BodySide::trail(handedness);
        let joint = |j: Joint, side: BodySide| frame.joint(j, side, min_visibility);

        let pair_heading = |j: Joint| Some(heading_xz_deg(joint(j, trail)?, joint(j, lead)?));
        let pair_width = |j: Joint| Some(joint(j, trail)?.distance_2d(joint(j, lead)?));

        let hip_center = frame.joint_center(Joint::Hip, min_visibility);
        let shoulder_center = frame.joint_center(Joint::Shoulder, min_visibility);

        let lead_weight_pct = (|| {
            let hip = hip_center?;
            let lead_ankle = joint(Joint::Ankle, lead)?;
            let trail_ankle = joint(Joint::Ankle, trail)?;
            let span = lead_ankle.x - trail_ankle.x;
            if span.abs() < EPSILON {
                return Some(50.0);
            }
            Some((hip.x - trail_ankle.x) / span * 100.0)
        })();

        let spine_tilt_deg = match (hip_center, shoulder_center) {
            (Some(hip), Some(shoulder)) => Some(tilt_from_vertical_deg(hip, shoulder)),
            _ => None,
        };

        let knee_flex_deg = (|| {
            let angle = joint_angle_3d_deg(
                joint(Joint::Hip, lead)?,
                joint(Joint::Knee, lead)?,
                joint(Joint::Ankle, lead)?,
            )?;
            Some(180.0 - angle)
        })();

        Self {
            shoulder_heading: pair_heading(Joint::Shoulder),
            hip_heading: pair_heading(Joint::Hip),
            lead_weight_pct,
            spine_tilt_deg,
            knee_flex_deg,
            head: frame.point(index::NOSE, min_visibility),
            shoulder_width: pair_width(Joint::Shoulder),
            stance_width: pair_width(Joint::Ankle),
        }
    }
}

/// Measure every frame of a sequence
pub fn measure_all(
    frames: &[PoseFrame],
    handedness: Handedness,
    min_visibility: f32,
) -> Vec<BodyMeasures> {
    frames
        .iter()
        .map(|f| BodyMeasures::from_frame(f, handedness, min_visibility))
        .collect()
}

/// Reference headings (shoulder, hip) from the first frame where each is known
pub fn reference_headings(measures: &[BodyMeasures]) -> (Option<f32>, Option<f32>) {
    let shoulder = measures.iter().find_map(|m| m.shoulder_heading);
    let hip = measures.iter().find_map(|m| m.hip_heading);
    (shoulder, hip)
}

/// Unsigned turn from `reference`, in [0, 180] degrees
pub fn rotation_deg(heading: Option<f32>, reference: Option<f32>) -> Option<f32> {
    Some(heading_difference_deg(heading?, reference?))
}

/// Per-frame angular speed of a heading series, in degrees per second
///
/// Frames without a heading on either side of a step contribute 0.
pub fn rotation_speeds(headings: &[Option<f32>], timestamps: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0; headings.len()];
    for i in 1..headings.len() {
        if let (Some(a), Some(b)) = (headings[i - 1], headings[i]) {
            out[i] = heading_difference_deg(b, a)
                / crate::pose::timestamps::delta_seconds(timestamps, i - 1, i);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::synthetic::SyntheticSwing;

    #[test]
    fn test_address_posture() {
        let frames = SyntheticSwing::default().generate();
        let m = BodyMeasures::from_frame(&frames[0], Handedness::Right, 0.5);
        assert!((m.lead_weight_pct.unwrap() - 50.0).abs() < 0.5);
        assert!(m.shoulder_heading.unwrap().abs() < 1e-3);
        let tilt = m.spine_tilt_deg.unwrap();
        assert!(tilt > 3.0 && tilt < 7.0, "tilt {}", tilt);
        let flex = m.knee_flex_deg.unwrap();
        assert!(flex > 15.0 && flex < 35.0, "flex {}", flex);
        assert!((m.shoulder_width.unwrap() - 0.14).abs() < 1e-3);
    }

    #[test]
    fn test_turn_at_top() {
        let swing = SyntheticSwing::default();
        let frames = swing.generate();
        let measures = measure_all(&frames, Handedness::Right, 0.5);
        let (shoulder_ref, hip_ref) = reference_headings(&measures);
        let top = &measures[swing.key_frames().top];
        let shoulders = rotation_deg(top.shoulder_heading, shoulder_ref).unwrap();
        let hips = rotation_deg(top.hip_heading, hip_ref).unwrap();
        assert!((shoulders - 90.0).abs() < 0.5);
        assert!((hips - 45.0).abs() < 0.5);
        // Weight moves to the trail side
        assert!(top.lead_weight_pct.unwrap() < 45.0);
    }

    #[test]
    fn test_left_handed_matches_right_handed() {
        let right = SyntheticSwing::default().generate();
        let left = SyntheticSwing::default()
            .handedness(Handedness::Left)
            .generate();
        let r = BodyMeasures::from_frame(&right[108], Handedness::Right, 0.5);
        let l = BodyMeasures::from_frame(&left[108], Handedness::Left, 0.5);
        assert!((r.lead_weight_pct.unwrap() - l.lead_weight_pct.unwrap()).abs() < 1e-3);
        assert!((r.knee_flex_deg.unwrap() - l.knee_flex_deg.unwrap()).abs() < 1e-3);
    }

    #[test]
    fn test_missing_landmarks_are_none() {
        let frames = SyntheticSwing::with_frames(10)
            .occlude(crate::pose::landmark::index::LEFT_ANKLE, 0..10)
            .generate();
        let m = BodyMeasures::from_frame(&frames[3], Handedness::Right, 0.5);
        assert!(m.lead_weight_pct.is_none());
        assert!(m.knee_flex_deg.is_none());
        assert!(m.shoulder_heading.is_some());
    }
}
