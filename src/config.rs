//! Configuration parameters for swing analysis
//!
//! [`AnalysisConfig`] is the single context object passed into the pipeline.
//! It is immutable for the duration of an analysis; nothing in the crate keeps
//! global state.

use serde::{Deserialize, Serialize};

use crate::analysis::benchmarks::SkillLevel;
use crate::pose::trajectory::TrackedPoint;

/// Club used for the swing (selects feedback phrasing only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClubType {
    /// Driver
    Driver,
    /// Fairway wood
    Wood,
    /// Hybrid
    Hybrid,
    /// Iron
    Iron,
    /// Wedge
    Wedge,
    /// Putter
    Putter,
}

impl ClubType {
    /// Human-readable club name used in feedback text
    pub fn name(&self) -> &'static str {
        match self {
            ClubType::Driver => "driver",
            ClubType::Wood => "fairway wood",
            ClubType::Hybrid => "hybrid",
            ClubType::Iron => "iron",
            ClubType::Wedge => "wedge",
            ClubType::Putter => "putter",
        }
    }
}

/// Golfer handedness, which decides the lead and trail sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    /// Right-handed golfer (lead side = left)
    Right,
    /// Left-handed golfer (lead side = right)
    Left,
}

/// Thresholds for the heuristic phase segmenter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Minimum number of frames for a real segmentation (default: 10)
    pub min_frames: usize,

    /// Fraction of the sequence searched for the takeaway (default: 0.4)
    pub address_search_fraction: f32,

    /// Tracked-point speed that marks the takeaway, in units/s (default: 0.1)
    pub address_velocity_threshold: f32,

    /// Displacement from frame 0 that marks the takeaway (default: 0.05)
    pub address_displacement_threshold: f32,

    /// Takeaway fallback as a fraction of the sequence (default: 0.1)
    pub address_fallback_fraction: f32,

    /// End of the top-of-backswing search window as a fraction (default: 0.8)
    pub top_search_end_fraction: f32,

    /// Height tolerance for top-of-backswing tie-breaking (default: 0.002)
    pub top_tie_tolerance: f32,

    /// Fractional speed decrease that counts as a velocity drop (default: 0.5)
    pub velocity_drop_ratio: f32,

    /// Downward speed that marks the downswing start, in units/s (default: 0.02)
    pub downswing_velocity_threshold: f32,

    /// Frames after the top used when no downswing start is found (default: 2)
    pub downswing_fallback_offset: usize,

    /// Start of the impact search window as a fraction (default: 0.4)
    pub impact_search_start_fraction: f32,

    /// Frames between impact and follow-through start (default: 3)
    pub follow_through_offset: usize,

    /// Minimum frames between consecutive boundaries (default: 2)
    pub min_phase_duration: usize,

    /// Point tracked for boundary detection (default: lead wrist)
    pub tracked_point: TrackedPoint,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_frames: 10,
            address_search_fraction: 0.4,
            address_velocity_threshold: 0.1,
            address_displacement_threshold: 0.05,
            address_fallback_fraction: 0.1,
            top_search_end_fraction: 0.8,
            top_tie_tolerance: 0.002,
            velocity_drop_ratio: 0.5,
            downswing_velocity_threshold: 0.02,
            downswing_fallback_offset: 2,
            impact_search_start_fraction: 0.4,
            follow_through_offset: 3,
            min_phase_duration: 2,
            tracked_point: TrackedPoint::LeadWrist,
        }
    }
}

/// Parameters for the impact consensus detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Minimum usable samples before any method reports evidence (default: 5)
    pub min_samples: usize,

    /// Club speed treated as full confidence, in units/s (default: 3.0)
    pub expected_max_speed: f32,

    /// Per-frame hip/knee lateral shift treated as full confidence (default: 0.02)
    pub expected_shift: f32,

    /// Vertical variance of the club path treated as full confidence (default: 0.01)
    pub expected_vertical_variance: f32,

    /// Club acceleration treated as full confidence, in units/s² (default: 60.0)
    pub expected_peak_acceleration: f32,

    /// Frames of disagreement tolerated against an external signal (default: 3)
    pub corroboration_tolerance: usize,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            min_samples: 5,
            expected_max_speed: 3.0,
            expected_shift: 0.02,
            expected_vertical_variance: 0.01,
            expected_peak_acceleration: 60.0,
            corroboration_tolerance: 3,
        }
    }
}

/// Capture resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Whether either dimension is zero
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Parameters for the club-path estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubPathConfig {
    /// Club length relative to the forearm (default: 2.3)
    pub arm_extension_ratio: f32,

    /// Grip projection scale relative to shoulder-to-grip (default: 1.5)
    pub torso_factor: f32,

    /// Swing-plane projection scale relative to elbow-to-grip (default: 2.0)
    pub arm_span_factor: f32,

    /// Reliability weights [geometric, biomechanical, swing plane]
    pub method_weights: [f32; 3],

    /// Expected club-head vertical range relative to body height (default: 1.0)
    pub expected_arc_height: f32,

    /// Canonical capture resolution (default: 1920x1080)
    pub reference_resolution: Resolution,

    /// Paths with fewer points report zero confidence (default: 10)
    pub min_points_for_confidence: usize,
}

impl Default for ClubPathConfig {
    fn default() -> Self {
        Self {
            arm_extension_ratio: 2.3,
            torso_factor: 1.5,
            arm_span_factor: 2.0,
            method_weights: [0.9, 0.75, 0.6],
            expected_arc_height: 1.0,
            reference_resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            min_points_for_confidence: 10,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Skill tier used to select benchmark corridors (default: Intermediate)
    pub skill_level: SkillLevel,

    /// Club used for the swing (default: Driver)
    pub club_type: ClubType,

    /// Golfer handedness (default: Right)
    pub handedness: Handedness,

    /// Frame rate assumed when no timestamps are available (default: 30.0)
    pub default_fps: f32,

    /// Landmarks below this visibility are never used (default: 0.5)
    pub min_visibility: f32,

    /// Phase segmentation thresholds
    pub segmentation: SegmentationConfig,

    /// Impact detection parameters
    pub impact: ImpactConfig,

    /// Club path estimation parameters
    pub club_path: ClubPathConfig,

    /// Frame capacity of the streaming window (default: 240)
    pub streaming_window_capacity: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            skill_level: SkillLevel::Intermediate,
            club_type: ClubType::Driver,
            handedness: Handedness::Right,
            default_fps: 30.0,
            min_visibility: 0.5,
            segmentation: SegmentationConfig::default(),
            impact: ImpactConfig::default(),
            club_path: ClubPathConfig::default(),
            streaming_window_capacity: 240,
        }
    }
}

impl AnalysisConfig {
    /// Config for a given skill level, everything else default
    pub fn for_skill_level(skill_level: SkillLevel) -> Self {
        Self {
            skill_level,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = AnalysisConfig::default();
        assert_eq!(config.segmentation.min_frames, 10);
        assert_eq!(config.impact.min_samples, 5);
        assert!((config.club_path.arm_extension_ratio - 2.3).abs() < 1e-6);
        assert!((config.default_fps - 30.0).abs() < 1e-6);
        // Geometric > biomechanical > swing-plane
        let w = config.club_path.method_weights;
        assert!(w[0] > w[1] && w[1] > w[2]);
    }

    #[test]
    fn test_degenerate_resolution() {
        assert!(!Resolution { width: 1920, height: 1080 }.is_degenerate());
        assert!(Resolution { width: 0, height: 1080 }.is_degenerate());
    }

    #[test]
    fn test_for_skill_level() {
        let config = AnalysisConfig::for_skill_level(SkillLevel::Professional);
        assert_eq!(config.skill_level, SkillLevel::Professional);
        assert_eq!(config.club_type, ClubType::Driver);
    }
}
