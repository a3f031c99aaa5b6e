//! Deterministic synthetic golf swings
//!
//! Generates 33-landmark pose sequences for a face-on camera. The lead wrist
//! holds still at address, rises with an ease-in-out to the top of the
//! backswing, accelerates down (ease-in, fastest at impact) to its lowest point
//! at impact, then decelerates into the finish. Shoulders, hips, knees and head
//! follow the same timeline, so every downstream heuristic sees a coherent
//! swing. No randomness is involved: the optional jitter is a fixed sinusoid.
//!
//! # Example
//!
//! ```
//! use stratum_swing::pose::synthetic::SyntheticSwing;
//!
//! let swing = SyntheticSwing::default();
//! let frames = swing.generate();
//! assert_eq!(frames.len(), 150);
//! assert_eq!(swing.key_frames().top, 75);
//! ```

use std::f32::consts::PI;
use std::ops::Range;

use super::geometry::Point3;
use super::landmark::{index, Landmark, PoseFrame, LANDMARK_COUNT};
use crate::config::Handedness;

/// Left/right landmark pairs in the MediaPipe layout
const MIRROR_PAIRS: [(usize, usize); 16] = [
    (1, 4),
    (2, 5),
    (3, 6),
    (7, 8),
    (9, 10),
    (11, 12),
    (13, 14),
    (15, 16),
    (17, 18),
    (19, 20),
    (21, 22),
    (23, 24),
    (25, 26),
    (27, 28),
    (29, 30),
    (31, 32),
];

/// Key frames of a generated swing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticKeyFrames {
    /// Last frame of the still address position
    pub takeaway: usize,
    /// Highest lead-wrist position
    pub top: usize,
    /// Lowest lead-wrist position
    pub impact: usize,
}

/// Synthetic swing generator
#[derive(Debug, Clone)]
pub struct SyntheticSwing {
    /// Number of frames (default: 150)
    pub frame_count: usize,
    /// Capture rate (default: 30.0)
    pub fps: f32,
    /// Golfer handedness (default: Right)
    pub handedness: Handedness,
    /// Visibility assigned to every landmark (default: 0.95)
    pub visibility: f32,
    /// Amplitude of the deterministic positional jitter (default: 0.0)
    pub jitter: f32,
    /// Landmarks forced to zero visibility over a frame range
    pub occlusions: Vec<(usize, Range<usize>)>,
}

impl Default for SyntheticSwing {
    fn default() -> Self {
        Self {
            frame_count: 150,
            fps: 30.0,
            handedness: Handedness::Right,
            visibility: 0.95,
            jitter: 0.0,
            occlusions: Vec::new(),
        }
    }
}

impl SyntheticSwing {
    /// Generator for `frame_count` frames at the default rate
    pub fn with_frames(frame_count: usize) -> Self {
        Self {
            frame_count,
            ..Self::default()
        }
    }

    /// Set the capture rate
    pub fn fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the golfer handedness
    pub fn handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    /// Set the visibility of every landmark
    pub fn visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }

    /// Add deterministic positional jitter
    pub fn jitter(mut self, amplitude: f32) -> Self {
        self.jitter = amplitude;
        self
    }

    /// Hide landmark `idx` over `frames`
    pub fn occlude(mut self, idx: usize, frames: Range<usize>) -> Self {
        self.occlusions.push((idx, frames));
        self
    }

    /// Key frames of the generated timeline
    pub fn key_frames(&self) -> SyntheticKeyFrames {
        let n = self.frame_count as f32;
        SyntheticKeyFrames {
            takeaway: (0.1 * n).round() as usize,
            top: (0.5 * n).round() as usize,
            impact: (0.72 * n).round() as usize,
        }
    }

    /// Capture timestamp of frame `i` in ms
    pub fn timestamp_ms(&self, i: usize) -> f32 {
        i as f32 * 1000.0 / self.fps.max(1e-3)
    }

    /// Generate the pose sequence
    pub fn generate(&self) -> Vec<PoseFrame> {
        (0..self.frame_count).map(|i| self.frame(i)).collect()
    }

    fn frame(&self, i: usize) -> PoseFrame {
        let p = self.progress(i);
        let mut points = [Point3::default(); LANDMARK_COUNT];

        // Lead wrist path: still, up to the top, down to impact, up to the finish
        let wrist = Point3::new(
            p.blend(0.52, 0.38, 0.53, 0.64),
            p.blend(0.70, 0.30, 0.75, 0.35),
            0.0,
        );

        let shoulder_turn = p.blend(0.0, 90.0, -20.0, -100.0).to_radians();
        // Hips unwind ahead of the shoulders
        let hip_turn = p.leading().blend(0.0, 45.0, -35.0, -80.0).to_radians();
        let shift = p.blend(0.0, -0.01, 0.03, 0.045);

        // Spine tilted slightly away from the target
        let shoulder_center = Point3::new(0.483 + 0.3 * shift, 0.35, 0.0);
        let (lead_shoulder, trail_shoulder) = rotate_pair(shoulder_center, 0.07, shoulder_turn);
        let hip_center = Point3::new(0.5 + shift, 0.55, 0.0);
        let (lead_hip, trail_hip) = rotate_pair(hip_center, 0.045, hip_turn);
        let knee_center = Point3::new(0.5 + 0.7 * shift, 0.70, 0.0);

        let trail_wrist = wrist.add(Point3::new(-0.015, 0.01, 0.0));
        let lead_elbow = lead_shoulder
            .add(wrist.sub(lead_shoulder).scale(0.5))
            .add(Point3::new(0.01, 0.0, 0.0));
        let trail_elbow = trail_shoulder
            .add(trail_wrist.sub(trail_shoulder).scale(0.5))
            .add(Point3::new(-0.01, 0.02, 0.0));

        let nose = Point3::new(0.5 + 0.2 * shift, 0.22, 0.0);

        // Right-handed layout: golfer's left (lead) appears on the image right
        points[index::NOSE] = nose;
        for (offset, (l, r)) in [(1usize, 4usize), (2, 5), (3, 6)].iter().enumerate() {
            let dx = 0.01 + 0.005 * offset as f32;
            points[*l] = nose.add(Point3::new(dx, -0.015, 0.0));
            points[*r] = nose.add(Point3::new(-dx, -0.015, 0.0));
        }
        points[index::LEFT_EAR] = nose.add(Point3::new(0.03, -0.005, 0.01));
        points[index::RIGHT_EAR] = nose.add(Point3::new(-0.03, -0.005, 0.01));
        points[9] = nose.add(Point3::new(0.008, 0.02, 0.0));
        points[10] = nose.add(Point3::new(-0.008, 0.02, 0.0));
        points[index::LEFT_SHOULDER] = lead_shoulder;
        points[index::RIGHT_SHOULDER] = trail_shoulder;
        points[index::LEFT_ELBOW] = lead_elbow;
        points[index::RIGHT_ELBOW] = trail_elbow;
        points[index::LEFT_WRIST] = wrist;
        points[index::RIGHT_WRIST] = trail_wrist;
        for (l, r) in [(17usize, 18usize), (19, 20), (21, 22)] {
            points[l] = wrist.add(Point3::new(0.0, 0.01, 0.0));
            points[r] = trail_wrist.add(Point3::new(0.0, 0.01, 0.0));
        }
        points[index::LEFT_HIP] = lead_hip;
        points[index::RIGHT_HIP] = trail_hip;
        // Knees flexed toward the camera
        points[index::LEFT_KNEE] = knee_center.add(Point3::new(0.055, 0.0, -0.035));
        points[index::RIGHT_KNEE] = knee_center.add(Point3::new(-0.055, 0.0, -0.035));
        points[index::LEFT_ANKLE] = Point3::new(0.57, 0.86, 0.0);
        points[index::RIGHT_ANKLE] = Point3::new(0.43, 0.86, 0.0);
        points[29] = Point3::new(0.565, 0.88, 0.01);
        points[30] = Point3::new(0.435, 0.88, 0.01);
        points[31] = Point3::new(0.59, 0.89, -0.02);
        points[32] = Point3::new(0.41, 0.89, -0.02);

        if self.handedness == Handedness::Left {
            for point in points.iter_mut() {
                point.x = 1.0 - point.x;
            }
            for (l, r) in MIRROR_PAIRS {
                points.swap(l, r);
            }
        }

        let landmarks = points
            .iter()
            .enumerate()
            .map(|(idx, point)| {
                let wobble = if self.jitter > 0.0 {
                    self.jitter * (i as f32 * 1.7 + idx as f32 * 0.3).sin()
                } else {
                    0.0
                };
                let hidden = self
                    .occlusions
                    .iter()
                    .any(|(occluded, range)| *occluded == idx && range.contains(&i));
                Landmark::new(
                    point.x + wobble,
                    point.y - wobble,
                    point.z,
                    if hidden { 0.0 } else { self.visibility },
                )
            })
            .collect();

        PoseFrame::new(self.timestamp_ms(i), landmarks)
    }

    fn progress(&self, i: usize) -> SwingProgress {
        let keys = self.key_frames();
        let last = self.frame_count.saturating_sub(1);
        if i <= keys.takeaway {
            SwingProgress::Address
        } else if i <= keys.top {
            let s = (i - keys.takeaway) as f32 / (keys.top - keys.takeaway).max(1) as f32;
            SwingProgress::Backswing((1.0 - (PI * s).cos()) / 2.0)
        } else if i <= keys.impact {
            let s = (i - keys.top) as f32 / (keys.impact - keys.top).max(1) as f32;
            SwingProgress::Downswing(s)
        } else {
            let s = (i - keys.impact) as f32 / (last.saturating_sub(keys.impact)).max(1) as f32;
            SwingProgress::FollowThrough(1.0 - (1.0 - s) * (1.0 - s))
        }
    }
}

/// Position along the swing timeline
///
/// Backswing and follow-through carry their eased fraction; the downswing
/// carries its raw fraction so leading segments can use their own easing.
#[derive(Debug, Clone, Copy)]
enum SwingProgress {
    Address,
    Backswing(f32),
    Downswing(f32),
    LeadingDownswing(f32),
    FollowThrough(f32),
}

impl SwingProgress {
    /// Downswing easing that peaks just before impact instead of at it
    fn leading(self) -> Self {
        match self {
            SwingProgress::Downswing(s) => SwingProgress::LeadingDownswing(s),
            other => other,
        }
    }

    /// Interpolate between the values at address, top, impact, and finish
    fn blend(self, address: f32, top: f32, impact: f32, finish: f32) -> f32 {
        match self {
            SwingProgress::Address => address,
            SwingProgress::Backswing(e) => address + (top - address) * e,
            SwingProgress::Downswing(s) => top + (impact - top) * s * s,
            SwingProgress::LeadingDownswing(s) => {
                // 1.6s² - 0.6s³: monotonic, speed peaks at s ≈ 0.89
                let e = 1.6 * s * s - 0.6 * s * s * s;
                top + (impact - top) * e
            }
            SwingProgress::FollowThrough(e) => impact + (finish - impact) * e,
        }
    }
}

/// Lead/trail points of a segment of half-width `half` turned by `angle` in x–z
fn rotate_pair(center: Point3, half: f32, angle: f32) -> (Point3, Point3) {
    let offset = Point3::new(half * angle.cos(), 0.0, half * angle.sin());
    (center.add(offset), center.sub(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_full_frames() {
        let frames = SyntheticSwing::default().generate();
        assert_eq!(frames.len(), 150);
        assert!(frames.iter().all(|f| f.landmarks.len() == LANDMARK_COUNT));
        assert!((frames[30].timestamp_ms - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_wrist_extremes_match_key_frames() {
        let swing = SyntheticSwing::default();
        let frames = swing.generate();
        let ys: Vec<f32> = frames.iter().map(|f| f.landmarks[index::LEFT_WRIST].y).collect();

        let top = (0..120)
            .min_by(|&a, &b| ys[a].partial_cmp(&ys[b]).unwrap())
            .unwrap();
        let low = (60..150)
            .max_by(|&a, &b| ys[a].partial_cmp(&ys[b]).unwrap())
            .unwrap();
        assert_eq!(top, swing.key_frames().top);
        assert_eq!(low, swing.key_frames().impact);
    }

    #[test]
    fn test_left_handed_mirrors_lead_wrist() {
        let right = SyntheticSwing::default().generate();
        let left = SyntheticSwing::default()
            .handedness(Handedness::Left)
            .generate();
        let r = right[40].landmarks[index::LEFT_WRIST];
        let l = left[40].landmarks[index::RIGHT_WRIST];
        assert!((r.x - (1.0 - l.x)).abs() < 1e-6);
        assert!((r.y - l.y).abs() < 1e-6);
    }

    #[test]
    fn test_occlusion_zeroes_visibility() {
        let frames = SyntheticSwing::default()
            .occlude(index::LEFT_WRIST, 10..20)
            .generate();
        assert_eq!(frames[15].landmarks[index::LEFT_WRIST].visibility, 0.0);
        assert!(frames[25].landmarks[index::LEFT_WRIST].visibility > 0.9);
    }

    #[test]
    fn test_deterministic() {
        let swing = SyntheticSwing::default().jitter(0.002);
        assert_eq!(swing.generate(), swing.generate());
    }
}
