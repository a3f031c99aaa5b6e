//! Analysis result types

use serde::{Deserialize, Serialize};

use super::confidence::AnalysisConfidence;
use super::scoring::{LetterGrade, SwingMetrics};
use super::validation::ValidationReport;
use crate::features::club_path::ClubPath;
use crate::features::impact::ImpactDetectionResult;
use crate::features::phase::{find_phase, Phase, PhaseName};

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Fewer frames or samples than a component requires
    InsufficientData,
    /// Required landmarks missing or below the visibility threshold in some frames
    InvalidLandmarks,
    /// Overall confidence below 0.5
    LowConfidence,
    /// Mean landmark visibility below 0.5
    LowVisibility,
    /// Phases are not six contiguous, ordered, non-empty segments
    PhaseInconsistency,
    /// Impact methods (or the impact phase) disagree on the impact frame
    ImpactDisagreement,
    /// A raw metric lies outside its physically possible range
    ImplausibleMetric,
    /// Club path was recalibrated for the capture resolution
    PathRecalibrated,
}

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Number of input frames
    pub frame_count: usize,

    /// Capture duration `t[N-1] - t[0]` in milliseconds
    pub duration_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Phase source that produced the phases
    pub phase_source: String,

    /// Methods used
    pub methods_used: Vec<String>,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,

    /// Confidence warnings (low confidence, degraded components, etc.)
    pub confidence_warnings: Vec<String>,
}

/// Complete swing analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingAnalysis {
    /// Six ordered phases tiling the frame range
    pub phases: Vec<Phase>,

    /// Consensus impact estimate
    pub impact: ImpactDetectionResult,

    /// Estimated club-head path
    pub club_path: ClubPath,

    /// Scored biomechanical metrics
    pub metrics: SwingMetrics,

    /// Plausibility and consistency review
    pub validation: ValidationReport,

    /// Cross-component confidence summary
    pub confidence: AnalysisConfidence,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl SwingAnalysis {
    /// Phase by name
    pub fn phase(&self, name: PhaseName) -> Option<&Phase> {
        find_phase(&self.phases, name)
    }

    /// First frame of the top phase
    pub fn top_frame(&self) -> Option<usize> {
        self.phase(PhaseName::Top).map(|p| p.start_frame)
    }

    /// Consensus impact frame
    pub fn impact_frame(&self) -> usize {
        self.impact.frame
    }

    /// Letter grade of the overall score
    pub fn grade(&self) -> LetterGrade {
        self.metrics.letter_grade
    }

    /// Whether `flag` was raised anywhere in the analysis
    pub fn has_flag(&self, flag: AnalysisFlag) -> bool {
        self.metadata.flags.contains(&flag)
    }
}
