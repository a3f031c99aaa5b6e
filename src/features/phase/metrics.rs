//! Per-phase derived metrics
//!
//! Every phase carries the same [`PhaseMetrics`] block (body rotation, weight
//! split, tracked-point velocity and acceleration over its window) plus one
//! [`PhaseDetail`] record whose variant matches the phase name.

use serde::{Deserialize, Serialize};

use super::PhaseName;
use crate::config::AnalysisConfig;
use crate::features::body::{measure_all, reference_headings, rotation_deg, BodyMeasures};
use crate::features::kinematics::{accelerations, speeds};
use crate::pose::landmark::PoseFrame;
use crate::pose::trajectory::Trajectory;

/// Metrics common to every phase
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseMetrics {
    /// Shoulder turn from address at the last frame of the phase (degrees)
    pub shoulder_rotation_deg: Option<f32>,

    /// Hip turn from address at the last frame of the phase (degrees)
    pub hip_rotation_deg: Option<f32>,

    /// Change in shoulder turn across the phase (degrees, signed)
    pub rotation_delta_deg: Option<f32>,

    /// Lead-side weight share at the last frame of the phase (percent)
    pub lead_weight_pct: Option<f32>,

    /// Peak tracked-point speed (units/s)
    pub peak_speed: f32,

    /// Mean tracked-point speed (units/s)
    pub mean_speed: f32,

    /// Peak tracked-point acceleration (units/s²)
    pub peak_acceleration: f32,
}

/// Phase-specific detail record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PhaseDetail {
    /// Setup posture
    Address {
        /// Ankle separation relative to shoulder width
        stance_ratio: Option<f32>,
        /// Lateral spine tilt (degrees)
        spine_tilt_deg: Option<f32>,
    },
    /// Takeaway to top
    Backswing {
        /// Rise of the tracked point across the phase (normalized units, up is positive)
        wrist_lift: f32,
    },
    /// Top of the swing
    Top {
        /// Shoulder turn minus hip turn at the top (degrees)
        x_factor_deg: Option<f32>,
    },
    /// Transition to the ball
    Downswing {
        /// Hip turn minus shoulder turn at the end of the downswing (degrees)
        hip_lead_deg: Option<f32>,
    },
    /// Contact
    Impact {
        /// Lateral head movement since address (normalized units)
        head_offset: Option<f32>,
    },
    /// After contact
    FollowThrough {
        /// Lead-side weight share at the finish (percent)
        finish_lead_pct: Option<f32>,
    },
}

impl PhaseDetail {
    /// Phase this record belongs to
    pub fn phase(&self) -> PhaseName {
        match self {
            PhaseDetail::Address { .. } => PhaseName::Address,
            PhaseDetail::Backswing { .. } => PhaseName::Backswing,
            PhaseDetail::Top { .. } => PhaseName::Top,
            PhaseDetail::Downswing { .. } => PhaseName::Downswing,
            PhaseDetail::Impact { .. } => PhaseName::Impact,
            PhaseDetail::FollowThrough { .. } => PhaseName::FollowThrough,
        }
    }
}

/// Precomputed per-frame series shared by all phase windows
pub struct PhaseContext<'a> {
    trajectory: &'a Trajectory,
    measures: Vec<BodyMeasures>,
    shoulder_ref: Option<f32>,
    hip_ref: Option<f32>,
    speeds: Vec<f32>,
    accelerations: Vec<f32>,
}

impl<'a> PhaseContext<'a> {
    /// Precompute body measures and tracked-point kinematics
    pub fn new(
        frames: &[PoseFrame],
        trajectory: &'a Trajectory,
        timestamps: &[f32],
        config: &AnalysisConfig,
    ) -> Self {
        let measures = measure_all(frames, config.handedness, config.min_visibility);
        let (shoulder_ref, hip_ref) = reference_headings(&measures);
        Self {
            trajectory,
            speeds: speeds(&trajectory.points, timestamps),
            accelerations: accelerations(&trajectory.points, timestamps),
            measures,
            shoulder_ref,
            hip_ref,
        }
    }

    fn last_index(&self) -> usize {
        self.measures.len().saturating_sub(1)
    }

    /// Clamp a half-open window to a non-empty frame range
    fn window(&self, start: usize, end: usize) -> (usize, usize) {
        let last = self.last_index();
        let first = start.min(last);
        let final_frame = end.saturating_sub(1).clamp(first, last);
        (first, final_frame)
    }

    fn shoulder_turn(&self, frame: usize) -> Option<f32> {
        rotation_deg(self.measures.get(frame)?.shoulder_heading, self.shoulder_ref)
    }

    fn hip_turn(&self, frame: usize) -> Option<f32> {
        rotation_deg(self.measures.get(frame)?.hip_heading, self.hip_ref)
    }

    /// Common metrics over `start..end`
    pub fn metrics(&self, start: usize, end: usize) -> PhaseMetrics {
        if self.measures.is_empty() {
            return PhaseMetrics::default();
        }
        let (first, final_frame) = self.window(start, end);

        let window_speeds = &self.speeds[first..=final_frame];
        let peak_speed = window_speeds.iter().copied().fold(0.0f32, f32::max);
        let mean_speed = window_speeds.iter().sum::<f32>() / window_speeds.len() as f32;
        let peak_acceleration = self.accelerations[first..=final_frame]
            .iter()
            .copied()
            .fold(0.0f32, f32::max);

        let rotation_delta_deg = match (self.shoulder_turn(first), self.shoulder_turn(final_frame)) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        };

        PhaseMetrics {
            shoulder_rotation_deg: self.shoulder_turn(final_frame),
            hip_rotation_deg: self.hip_turn(final_frame),
            rotation_delta_deg,
            lead_weight_pct: self.measures[final_frame].lead_weight_pct,
            peak_speed,
            mean_speed,
            peak_acceleration,
        }
    }

    /// Detail record for phase `name` over `start..end`
    pub fn detail(&self, name: PhaseName, start: usize, end: usize) -> PhaseDetail {
        let (first, final_frame) = if self.measures.is_empty() {
            (0, 0)
        } else {
            self.window(start, end)
        };
        let at = |frame: usize| self.measures.get(frame).copied().unwrap_or_default();

        match name {
            PhaseName::Address => {
                let m = at(first);
                let stance_ratio = match (m.stance_width, m.shoulder_width) {
                    (Some(stance), Some(shoulders)) if shoulders > 0.0 => Some(stance / shoulders),
                    _ => None,
                };
                PhaseDetail::Address {
                    stance_ratio,
                    spine_tilt_deg: m.spine_tilt_deg,
                }
            }
            PhaseName::Backswing => {
                let wrist_lift = match (
                    self.trajectory.points.get(first),
                    self.trajectory.points.get(final_frame),
                ) {
                    // Screen y grows downward
                    (Some(a), Some(b)) => a.y - b.y,
                    _ => 0.0,
                };
                PhaseDetail::Backswing { wrist_lift }
            }
            PhaseName::Top => PhaseDetail::Top {
                x_factor_deg: match (self.shoulder_turn(first), self.hip_turn(first)) {
                    (Some(s), Some(h)) => Some(s - h),
                    _ => None,
                },
            },
            PhaseName::Downswing => PhaseDetail::Downswing {
                hip_lead_deg: match (self.shoulder_turn(final_frame), self.hip_turn(final_frame)) {
                    (Some(s), Some(h)) => Some(h - s),
                    _ => None,
                },
            },
            PhaseName::Impact => {
                let address_head = self.measures.iter().find_map(|m| m.head);
                let head_offset = match (address_head, at(first).head) {
                    (Some(a), Some(b)) => Some((b.x - a.x).abs()),
                    _ => None,
                };
                PhaseDetail::Impact { head_offset }
            }
            PhaseName::FollowThrough => PhaseDetail::FollowThrough {
                finish_lead_pct: at(final_frame).lead_weight_pct,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::synthetic::SyntheticSwing;
    use crate::pose::trajectory::{extract_trajectory, TrackedPoint};

    fn fixture(swing: &SyntheticSwing) -> (Vec<PoseFrame>, Trajectory, Vec<f32>) {
        let frames = swing.generate();
        let trajectory = extract_trajectory(&frames, TrackedPoint::LeadWrist, swing.handedness, 0.5);
        let stamps = frames.iter().map(|f| f.timestamp_ms).collect();
        (frames, trajectory, stamps)
    }

    #[test]
    fn test_top_detail_has_x_factor() {
        let swing = SyntheticSwing::default();
        let (frames, trajectory, stamps) = fixture(&swing);
        let ctx = PhaseContext::new(&frames, &trajectory, &stamps, &AnalysisConfig::default());
        let top = swing.key_frames().top;
        match ctx.detail(PhaseName::Top, top, top + 2) {
            PhaseDetail::Top { x_factor_deg } => {
                assert!((x_factor_deg.unwrap() - 45.0).abs() < 1.0);
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_backswing_lifts_wrist() {
        let swing = SyntheticSwing::default();
        let (frames, trajectory, stamps) = fixture(&swing);
        let ctx = PhaseContext::new(&frames, &trajectory, &stamps, &AnalysisConfig::default());
        let detail = ctx.detail(PhaseName::Backswing, 15, 76);
        assert_eq!(detail.phase(), PhaseName::Backswing);
        if let PhaseDetail::Backswing { wrist_lift } = detail {
            assert!((wrist_lift - 0.4).abs() < 1e-3);
        }

        let m = ctx.metrics(15, 76);
        assert!((m.shoulder_rotation_deg.unwrap() - 90.0).abs() < 0.5);
        assert!(m.rotation_delta_deg.unwrap() > 85.0);
        assert!(m.peak_speed > m.mean_speed);
    }

    #[test]
    fn test_empty_window_uses_start_frame() {
        let swing = SyntheticSwing::with_frames(3);
        let (frames, trajectory, stamps) = fixture(&swing);
        let ctx = PhaseContext::new(&frames, &trajectory, &stamps, &AnalysisConfig::default());
        let m = ctx.metrics(2, 2);
        assert!(m.peak_speed.is_finite());
        assert!(m.lead_weight_pct.is_some());
    }
}
