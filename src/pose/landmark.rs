//! Landmark and pose-frame types
//!
//! Frames follow the MediaPipe Pose layout: 33 landmarks per frame, each with
//! a visibility score in [0, 1]. A landmark that is absent, non-finite, or
//! below the configured visibility threshold is never treated as evidence.

use serde::{Deserialize, Serialize};

use super::geometry::Point3;
use crate::config::Handedness;

/// Number of landmarks in every pose frame
pub const LANDMARK_COUNT: usize = 33;

/// MediaPipe Pose landmark indices used by the engine
pub mod index {
    /// Nose
    pub const NOSE: usize = 0;
    /// Left ear
    pub const LEFT_EAR: usize = 7;
    /// Right ear
    pub const RIGHT_EAR: usize = 8;
    /// Left shoulder
    pub const LEFT_SHOULDER: usize = 11;
    /// Right shoulder
    pub const RIGHT_SHOULDER: usize = 12;
    /// Left elbow
    pub const LEFT_ELBOW: usize = 13;
    /// Right elbow
    pub const RIGHT_ELBOW: usize = 14;
    /// Left wrist
    pub const LEFT_WRIST: usize = 15;
    /// Right wrist
    pub const RIGHT_WRIST: usize = 16;
    /// Left hip
    pub const LEFT_HIP: usize = 23;
    /// Right hip
    pub const RIGHT_HIP: usize = 24;
    /// Left knee
    pub const LEFT_KNEE: usize = 25;
    /// Right knee
    pub const RIGHT_KNEE: usize = 26;
    /// Left ankle
    pub const LEFT_ANKLE: usize = 27;
    /// Right ankle
    pub const RIGHT_ANKLE: usize = 28;
}

/// A single body landmark
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, normalized to [0, 1]
    pub x: f32,
    /// Vertical position, normalized to [0, 1] (grows downward)
    pub y: f32,
    /// Relative depth
    pub z: f32,
    /// Visibility / detection confidence in [0, 1]
    pub visibility: f32,
}

impl Landmark {
    /// Create a landmark
    pub const fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Position as a point
    pub fn point(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }

    /// Whether the landmark can be used as evidence
    pub fn is_valid(&self, min_visibility: f32) -> bool {
        self.visibility > 0.0
            && self.visibility >= min_visibility
            && self.visibility.is_finite()
            && self.point().is_finite()
    }
}

/// Which side of the body a joint belongs to, anatomically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodySide {
    /// Golfer's left
    Left,
    /// Golfer's right
    Right,
}

impl BodySide {
    /// Lead side for a golfer of the given handedness
    pub fn lead(handedness: Handedness) -> Self {
        match handedness {
            Handedness::Right => BodySide::Left,
            Handedness::Left => BodySide::Right,
        }
    }

    /// Trail side for a golfer of the given handedness
    pub fn trail(handedness: Handedness) -> Self {
        match Self::lead(handedness) {
            BodySide::Left => BodySide::Right,
            BodySide::Right => BodySide::Left,
        }
    }
}

/// Paired joints tracked on both sides of the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Joint {
    /// Ear
    Ear,
    /// Shoulder
    Shoulder,
    /// Elbow
    Elbow,
    /// Wrist
    Wrist,
    /// Hip
    Hip,
    /// Knee
    Knee,
    /// Ankle
    Ankle,
}

impl Joint {
    /// Landmark index of this joint on the given side
    pub fn index(&self, side: BodySide) -> usize {
        use index::*;
        match (self, side) {
            (Joint::Ear, BodySide::Left) => LEFT_EAR,
            (Joint::Ear, BodySide::Right) => RIGHT_EAR,
            (Joint::Shoulder, BodySide::Left) => LEFT_SHOULDER,
            (Joint::Shoulder, BodySide::Right) => RIGHT_SHOULDER,
            (Joint::Elbow, BodySide::Left) => LEFT_ELBOW,
            (Joint::Elbow, BodySide::Right) => RIGHT_ELBOW,
            (Joint::Wrist, BodySide::Left) => LEFT_WRIST,
            (Joint::Wrist, BodySide::Right) => RIGHT_WRIST,
            (Joint::Hip, BodySide::Left) => LEFT_HIP,
            (Joint::Hip, BodySide::Right) => RIGHT_HIP,
            (Joint::Knee, BodySide::Left) => LEFT_KNEE,
            (Joint::Knee, BodySide::Right) => RIGHT_KNEE,
            (Joint::Ankle, BodySide::Left) => LEFT_ANKLE,
            (Joint::Ankle, BodySide::Right) => RIGHT_ANKLE,
        }
    }
}

/// One timestamped snapshot of body landmarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Capture timestamp in milliseconds
    pub timestamp_ms: f32,

    /// Landmarks in MediaPipe order (33 expected)
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    /// Create a frame
    pub fn new(timestamp_ms: f32, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            landmarks,
        }
    }

    /// Landmark at `idx`, or `None` when absent
    pub fn landmark(&self, idx: usize) -> Option<&Landmark> {
        self.landmarks.get(idx)
    }

    /// Landmark at `idx` when it passes the visibility threshold
    pub fn valid_landmark(&self, idx: usize, min_visibility: f32) -> Option<&Landmark> {
        self.landmark(idx).filter(|lm| lm.is_valid(min_visibility))
    }

    /// Position of landmark `idx` when it passes the visibility threshold
    pub fn point(&self, idx: usize, min_visibility: f32) -> Option<Point3> {
        self.valid_landmark(idx, min_visibility).map(Landmark::point)
    }

    /// Position of a paired joint on one side
    pub fn joint(&self, joint: Joint, side: BodySide, min_visibility: f32) -> Option<Point3> {
        self.point(joint.index(side), min_visibility)
    }

    /// Midpoint of a joint pair, when both sides are valid
    pub fn joint_center(&self, joint: Joint, min_visibility: f32) -> Option<Point3> {
        let left = self.joint(joint, BodySide::Left, min_visibility)?;
        let right = self.joint(joint, BodySide::Right, min_visibility)?;
        Some(left.midpoint(right))
    }

    /// Visibility of landmark `idx` (0 when absent)
    pub fn visibility(&self, idx: usize) -> f32 {
        self.landmark(idx)
            .map(|lm| if lm.visibility.is_finite() { lm.visibility.clamp(0.0, 1.0) } else { 0.0 })
            .unwrap_or(0.0)
    }

    /// Mean visibility over all landmarks present
    pub fn mean_visibility(&self) -> f32 {
        if self.landmarks.is_empty() {
            return 0.0;
        }
        let sum: f32 = (0..self.landmarks.len()).map(|i| self.visibility(i)).sum();
        sum / self.landmarks.len() as f32
    }

    /// Whether at least one landmark is usable
    pub fn has_visible_landmark(&self, min_visibility: f32) -> bool {
        self.landmarks.iter().any(|lm| lm.is_valid(min_visibility))
    }
}
