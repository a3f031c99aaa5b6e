//! Single-point trajectories derived from pose frames
//!
//! The phase segmenter tracks one point (usually the lead wrist) through the
//! swing. Frames where the point is not visible are bridged by linear
//! interpolation between the nearest observed frames; leading and trailing
//! gaps hold the nearest observation. The `observed` mask keeps track of which
//! samples are real.

use serde::{Deserialize, Serialize};

use super::geometry::Point3;
use super::landmark::{BodySide, Joint, PoseFrame};
use crate::config::Handedness;

/// Point tracked by the phase segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackedPoint {
    /// Lead-side wrist
    LeadWrist,
    /// Midpoint of both wrists
    GripCenter,
}

/// Per-frame positions of a tracked point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// One position per frame (gaps filled)
    pub points: Vec<Point3>,

    /// Whether each position was observed (vs. filled)
    pub observed: Vec<bool>,
}

impl Trajectory {
    /// Build a trajectory from raw per-frame observations
    pub fn from_observations(raw: &[Option<Point3>]) -> Self {
        let observed: Vec<bool> = raw.iter().map(Option::is_some).collect();
        let known: Vec<usize> = (0..raw.len()).filter(|&i| observed[i]).collect();

        if known.is_empty() {
            return Self {
                points: vec![Point3::default(); raw.len()],
                observed,
            };
        }

        let mut points = Vec::with_capacity(raw.len());
        let mut next_known = 0usize;
        for i in 0..raw.len() {
            if let Some(p) = raw[i] {
                points.push(p);
                continue;
            }
            while next_known < known.len() && known[next_known] < i {
                next_known += 1;
            }
            let after = known.get(next_known).copied();
            let before = if next_known > 0 {
                Some(known[next_known - 1])
            } else {
                None
            };
            let filled = match (before, after) {
                (Some(b), Some(a)) => {
                    let pb = raw[b].unwrap_or_default();
                    let pa = raw[a].unwrap_or_default();
                    let t = (i - b) as f32 / (a - b) as f32;
                    pb.add(pa.sub(pb).scale(t))
                }
                (Some(b), None) => raw[b].unwrap_or_default(),
                (None, Some(a)) => raw[a].unwrap_or_default(),
                (None, None) => Point3::default(),
            };
            points.push(filled);
        }

        Self { points, observed }
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trajectory has no frames
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of observed (not filled) samples
    pub fn observed_count(&self) -> usize {
        self.observed.iter().filter(|&&o| o).count()
    }

    /// Vertical coordinate series
    pub fn ys(&self) -> Vec<f32> {
        self.points.iter().map(|p| p.y).collect()
    }
}

/// Extract the tracked point from every frame
pub fn extract_trajectory(
    frames: &[PoseFrame],
    tracked: TrackedPoint,
    handedness: Handedness,
    min_visibility: f32,
) -> Trajectory {
    let lead = BodySide::lead(handedness);
    let raw: Vec<Option<Point3>> = frames
        .iter()
        .map(|frame| match tracked {
            TrackedPoint::LeadWrist => frame.joint(Joint::Wrist, lead, min_visibility),
            TrackedPoint::GripCenter => frame.joint_center(Joint::Wrist, min_visibility),
        })
        .collect();

    let trajectory = Trajectory::from_observations(&raw);
    log::debug!(
        "Extracted {:?} trajectory: {}/{} frames observed",
        tracked,
        trajectory.observed_count(),
        trajectory.len()
    );
    trajectory
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_gap_is_interpolated() {
        let raw = vec![
            Some(Point3::new(0.0, 0.0, 0.0)),
            None,
            None,
            Some(Point3::new(0.3, 0.6, 0.0)),
        ];
        let t = Trajectory::from_observations(&raw);
        assert_eq!(t.len(), 4);
        assert!((t.points[1].x - 0.1).abs() < 1e-6);
        assert!((t.points[2].y - 0.4).abs() < 1e-6);
        assert_eq!(t.observed_count(), 2);
        assert!(!t.observed[1]);
    }

    #[test]
    fn test_edge_gaps_hold_nearest() {
        let raw = vec![None, Some(Point3::new(0.2, 0.2, 0.0)), None];
        let t = Trajectory::from_observations(&raw);
        assert_eq!(t.points[0], Point3::new(0.2, 0.2, 0.0));
        assert_eq!(t.points[2], Point3::new(0.2, 0.2, 0.0));
    }

    #[test]
    fn test_no_observations() {
        let raw = vec![None, None];
        let t = Trajectory::from_observations(&raw);
        assert_eq!(t.len(), 2);
        assert_eq!(t.observed_count(), 0);
    }
}
