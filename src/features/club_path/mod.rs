//! Club-head path estimation
//!
//! The club is never tracked directly. Each frame with usable arm landmarks
//! yields three independent club-head candidates, merged by confidence into
//! one trajectory point:
//! - Geometric arm extension
//! - Biomechanical grip projection
//! - Swing-plane projection
//!
//! The trajectory is then optionally recalibrated for capture resolution and
//! scored for smoothness, arc height and continuity.

pub mod calibration;
pub mod candidates;
pub mod estimator;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::config::Resolution;
use crate::pose::geometry::Point3;

pub use estimator::estimate_path;

/// One estimated club-head position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClubPathPoint {
    /// Horizontal position (normalized)
    pub x: f32,
    /// Vertical position (normalized, grows downward)
    pub y: f32,
    /// Relative depth
    pub z: f32,
    /// Source frame index
    pub frame: usize,
    /// Source frame timestamp in ms
    pub timestamp_ms: f32,
    /// Image-plane speed in normalized units per second (derived)
    pub velocity: f32,
    /// Point confidence in [0, 1]
    pub confidence: f32,
}

impl ClubPathPoint {
    /// Position as a point
    pub fn position(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }
}

/// Optional capture metadata supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoMeta {
    /// Capture resolution
    pub resolution: Resolution,
}

/// Estimated club-head trajectory with quality scores
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClubPath {
    /// Trajectory points, strictly increasing by frame
    pub points: Vec<ClubPathPoint>,

    /// Overall accuracy estimate in [0, 1]
    pub accuracy: f32,

    /// Overall confidence in [0, 1]
    pub confidence: f32,

    /// Smoothness: inverse of normalized velocity variance, in [0, 1]
    pub smoothness: f32,

    /// |relative vertical range - expected swing-arc height|
    pub arc_height_deviation: f32,

    /// Accepted points / frames spanned, in [0, 1]
    pub continuity: f32,

    /// Whether resolution recalibration was applied
    pub calibration_used: bool,

    /// Frames skipped for missing landmarks
    pub skipped_frames: usize,

    /// Diagnostic notes (insufficient data, gaps, calibration)
    pub notes: Vec<String>,
}

impl ClubPath {
    /// Number of trajectory points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trajectory has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point estimated for `frame`, if any
    pub fn point_at(&self, frame: usize) -> Option<&ClubPathPoint> {
        self.points
            .binary_search_by_key(&frame, |p| p.frame)
            .ok()
            .map(|i| &self.points[i])
    }
}
