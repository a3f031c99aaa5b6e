//! Swing phase segmentation
//!
//! Splits a swing into six contiguous phases:
//! Address → Backswing → Top → Downswing → Impact → Follow-through
//!
//! - `segmenter`: heuristic boundary search over a tracked point
//! - `metrics`: per-phase derived metrics and tagged detail records
//!
//! Phase frame ranges are half-open (`start_frame..end_frame`); the last phase
//! ends at the frame count, so the six ranges tile `0..N`.

pub mod metrics;
pub mod segmenter;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::pose::landmark::PoseFrame;

pub use metrics::{PhaseDetail, PhaseMetrics};
pub use segmenter::{segment, HeuristicSegmenter};

/// Named swing phase, in swing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PhaseName {
    /// Static setup before the takeaway
    Address,
    /// Takeaway up to the top
    Backswing,
    /// Transition at the top of the swing
    Top,
    /// Top down to the ball
    Downswing,
    /// Contact window
    Impact,
    /// After contact to the finish
    FollowThrough,
}

impl PhaseName {
    /// All phases in swing order
    pub const ALL: [PhaseName; 6] = [
        PhaseName::Address,
        PhaseName::Backswing,
        PhaseName::Top,
        PhaseName::Downswing,
        PhaseName::Impact,
        PhaseName::FollowThrough,
    ];

    /// Human-readable phase name
    pub fn name(&self) -> &'static str {
        match self {
            PhaseName::Address => "address",
            PhaseName::Backswing => "backswing",
            PhaseName::Top => "top",
            PhaseName::Downswing => "downswing",
            PhaseName::Impact => "impact",
            PhaseName::FollowThrough => "follow-through",
        }
    }

    /// Position in swing order (0-5)
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

/// One segment of the swing timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Phase name
    pub name: PhaseName,

    /// First frame (inclusive)
    pub start_frame: usize,

    /// End frame (exclusive)
    pub end_frame: usize,

    /// Start time in ms
    pub start_time_ms: f32,

    /// End time in ms (the next phase's start time)
    pub end_time_ms: f32,

    /// `end_time_ms - start_time_ms`
    pub duration_ms: f32,

    /// Heuristic confidence (0.0-1.0)
    pub confidence: f32,

    /// Metrics derived over the phase window
    pub metrics: PhaseMetrics,

    /// Phase-specific detail
    pub detail: PhaseDetail,
}

impl Phase {
    /// Number of frames in the phase
    pub fn frame_count(&self) -> usize {
        self.end_frame.saturating_sub(self.start_frame)
    }

    /// Whether `frame` falls inside the phase
    pub fn contains(&self, frame: usize) -> bool {
        (self.start_frame..self.end_frame).contains(&frame)
    }
}

/// Look up a phase by name
pub fn find_phase(phases: &[Phase], name: PhaseName) -> Option<&Phase> {
    phases.iter().find(|p| p.name == name)
}

/// A producer of swing phases
///
/// The heuristic segmenter is the built-in source. Any alternative (for
/// example, a trained classifier supplied by the caller) must return the six
/// phases in order, tiling `0..frames.len()`; the validator reports any source
/// that does not.
pub trait PhaseSource {
    /// Short identifier recorded in the analysis metadata
    fn name(&self) -> &str;

    /// Segment the sequence into phases
    fn detect_phases(
        &self,
        frames: &[PoseFrame],
        timestamps: &[f32],
        config: &AnalysisConfig,
    ) -> Vec<Phase>;
}
