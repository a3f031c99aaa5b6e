//! # Stratum Swing
//!
//! A golf swing biomechanics analysis engine working from per-frame body pose
//! landmarks, providing phase segmentation, impact detection, club-head path
//! estimation and benchmark scoring.
//!
//! ## Features
//!
//! - **Phase Segmentation**: Address, backswing, top, downswing, impact and
//!   follow-through from a single tracked point
//! - **Impact Detection**: Four independent heuristics merged by confidence-weighted consensus
//! - **Club Path**: Three club-head candidates per frame, recalibrated and quality-scored
//! - **Scoring**: Tempo, rotation, weight transfer, swing plane and body
//!   alignment against per-skill-tier benchmark corridors, with a letter grade
//! - **Validation**: Plausibility and consistency checks with a reliability grade
//!
//! ## Quick Start
//!
//! ```
//! use stratum_swing::{analyze_swing, AnalysisConfig};
//! use stratum_swing::pose::synthetic::SyntheticSwing;
//!
//! // 150 frames of 33 landmarks each, e.g. from a pose-estimation model
//! let frames = SyntheticSwing::default().generate();
//!
//! let result = analyze_swing(&frames, None, &AnalysisConfig::default())?;
//!
//! println!("Impact at frame {} (confidence: {:.2})", result.impact.frame, result.impact.confidence);
//! println!("Score: {:.1} ({:?})", result.metrics.overall_score, result.metrics.letter_grade);
//! # Ok::<(), stratum_swing::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline follows this flow:
//!
//! ```text
//! Pose Frames → Club Path → Impact Consensus → Phase Segmentation → Scoring → Validation → Output
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod pose;

// Re-export main types
pub use analysis::benchmarks::SkillLevel;
pub use analysis::result::{AnalysisFlag, AnalysisMetadata, SwingAnalysis};
pub use analysis::scoring::{LetterGrade, SwingMetrics};
pub use analysis::validation::{ReliabilityGrade, ValidationReport};
pub use config::{AnalysisConfig, ClubType, Handedness};
pub use error::AnalysisError;
pub use features::club_path::{ClubPath, ClubPathPoint, VideoMeta};
pub use features::impact::{ImpactCorroboration, ImpactDetectionResult};
pub use features::phase::{Phase, PhaseName, PhaseSource};
pub use pose::{Landmark, PoseFrame};

use analysis::confidence::compute_confidence;
use features::club_path::estimate_path;
use features::impact::{detect_impact, ImpactMethod};
use features::phase::HeuristicSegmenter;
use pose::landmark::LANDMARK_COUNT;
use pose::timestamps::{capture_duration_ms, resolve_timestamps};

/// Main analysis function
///
/// Analyzes a pose sequence with the heuristic phase source and returns the
/// complete result bundle.
///
/// # Arguments
///
/// * `frames` - Time-ordered pose frames, 33 landmarks each
/// * `timestamps` - Optional per-frame timestamps in ms (defaults to the
///   frames' own timestamps, then to `config.default_fps`)
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `SwingAnalysis` with phases, impact, club path, metrics, validation and metadata
///
/// # Errors
///
/// Returns [`AnalysisError::FatalInput`] for an empty sequence, a frame
/// without exactly 33 landmarks, an unusable timestamp array, or a sequence
/// without a single visible landmark. Sparse or degraded input never fails;
/// it yields a zero-confidence result annotated with warnings.
///
/// # Example
///
/// ```
/// use stratum_swing::{analyze_swing, AnalysisConfig, AnalysisFlag};
/// use stratum_swing::pose::synthetic::SyntheticSwing;
///
/// let frames = SyntheticSwing::with_frames(3).generate();
/// let result = analyze_swing(&frames, None, &AnalysisConfig::default())?;
/// assert_eq!(result.impact.confidence, 0.0);
/// assert!(result.has_flag(AnalysisFlag::InsufficientData));
/// # Ok::<(), stratum_swing::AnalysisError>(())
/// ```
pub fn analyze_swing(
    frames: &[PoseFrame],
    timestamps: Option<&[f32]>,
    config: &AnalysisConfig,
) -> Result<SwingAnalysis, AnalysisError> {
    SwingAnalyzer::new(config.clone()).analyze(frames, timestamps)
}

/// Explicit analysis context
///
/// Holds the configuration, the phase source and optional collaborator inputs
/// (capture metadata, an external impact signal). Nothing is shared between
/// calls to [`analyze`](Self::analyze).
pub struct SwingAnalyzer {
    config: AnalysisConfig,
    phase_source: Box<dyn PhaseSource + Send + Sync>,
    video_meta: Option<VideoMeta>,
    corroboration: Option<ImpactCorroboration>,
}

impl SwingAnalyzer {
    /// Analyzer using the heuristic segmenter
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            phase_source: Box::new(HeuristicSegmenter),
            video_meta: None,
            corroboration: None,
        }
    }

    /// Replace the phase source (e.g. with a trained classifier)
    pub fn with_phase_source(mut self, source: impl PhaseSource + Send + Sync + 'static) -> Self {
        self.phase_source = Box::new(source);
        self
    }

    /// Supply capture metadata for club-path recalibration
    pub fn with_video_meta(mut self, meta: VideoMeta) -> Self {
        self.video_meta = Some(meta);
        self
    }

    /// Supply an external impact signal for discrepancy notes
    pub fn with_corroboration(mut self, corroboration: ImpactCorroboration) -> Self {
        self.corroboration = Some(corroboration);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the full pipeline
    ///
    /// # Errors
    ///
    /// See [`analyze_swing`].
    pub fn analyze(
        &self,
        frames: &[PoseFrame],
        timestamps: Option<&[f32]>,
    ) -> Result<SwingAnalysis, AnalysisError> {
        let config = &self.config;
        log::debug!("Starting swing analysis: {} frames", frames.len());

        check_input(frames, config)?;
        let timestamps = resolve_timestamps(frames, timestamps, config.default_fps)?;

        // Club path feeds impact detection
        let club_path = estimate_path(frames, &timestamps, self.video_meta.as_ref(), config);
        let impact = detect_impact(frames, &club_path, self.corroboration.as_ref(), config);

        let phases = self.phase_source.detect_phases(frames, &timestamps, config);
        if phases.len() != PhaseName::ALL.len() {
            log::warn!(
                "Phase source '{}' returned {} phases",
                self.phase_source.name(),
                phases.len()
            );
        }

        let metrics = analysis::scoring::score(&phases, frames, &club_path, &timestamps, config);
        let validation =
            analysis::validation::validate(frames, &metrics, &phases, &impact, &club_path, config);
        let confidence = compute_confidence(&phases, &impact, &club_path);

        let mut flags = validation.flags.clone();
        for flag in &confidence.flags {
            if !flags.contains(flag) {
                flags.push(*flag);
            }
        }

        let mut confidence_warnings = validation.warnings.clone();
        confidence_warnings.extend(club_path.notes.iter().cloned());
        confidence_warnings.extend(impact.notes.iter().cloned());
        for warning in &confidence_warnings {
            log::warn!("{}", warning);
        }

        let mut methods_used = vec![format!("phases:{}", self.phase_source.name())];
        methods_used.extend(
            ["geometric_extension", "grip_projection", "swing_plane_projection"]
                .iter()
                .map(|m| format!("club_path:{}", m)),
        );
        methods_used.extend(
            ImpactMethod::ALL
                .iter()
                .map(|m| format!("impact:{:?}", m)),
        );

        let metadata = AnalysisMetadata {
            frame_count: frames.len(),
            duration_ms: capture_duration_ms(&timestamps),
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            phase_source: self.phase_source.name().to_string(),
            methods_used,
            flags,
            confidence_warnings,
        };

        log::debug!(
            "Swing analysis complete: impact {} ({:.2}), score {:.1} {}, reliability {:.2}",
            impact.frame,
            impact.confidence,
            metrics.overall_score,
            metrics.letter_grade.as_str(),
            validation.reliability
        );

        Ok(SwingAnalysis {
            phases,
            impact,
            club_path,
            metrics,
            validation,
            confidence,
            metadata,
        })
    }
}

/// Reject input no component can work with
fn check_input(frames: &[PoseFrame], config: &AnalysisConfig) -> Result<(), AnalysisError> {
    if frames.is_empty() {
        return Err(AnalysisError::FatalInput("Empty pose sequence".to_string()));
    }

    if let Some((i, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, f)| f.landmarks.len() != LANDMARK_COUNT)
    {
        return Err(AnalysisError::FatalInput(format!(
            "Frame {} has {} landmarks, expected {}",
            i,
            frame.landmarks.len(),
            LANDMARK_COUNT
        )));
    }

    if !frames
        .iter()
        .any(|f| f.has_visible_landmark(config.min_visibility))
    {
        return Err(AnalysisError::FatalInput(
            "No frame contains a visible landmark".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::synthetic::SyntheticSwing;

    struct FixedPhases;

    impl PhaseSource for FixedPhases {
        fn name(&self) -> &str {
            "fixed"
        }

        fn detect_phases(
            &self,
            frames: &[PoseFrame],
            timestamps: &[f32],
            config: &AnalysisConfig,
        ) -> Vec<Phase> {
            // Delegate, but tag the source
            HeuristicSegmenter.detect_phases(frames, timestamps, config)
        }
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let err = analyze_swing(&[], None, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::FatalInput(_)));
    }

    #[test]
    fn test_wrong_landmark_count_is_fatal() {
        let mut frames = SyntheticSwing::with_frames(20).generate();
        frames[7].landmarks.truncate(17);
        let err = analyze_swing(&frames, None, &AnalysisConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Frame 7"));
    }

    #[test]
    fn test_invisible_input_is_fatal() {
        let frames = SyntheticSwing::with_frames(20).visibility(0.0).generate();
        let err = analyze_swing(&frames, None, &AnalysisConfig::default()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_phase_source_is_recorded() {
        let frames = SyntheticSwing::default().generate();
        let analyzer = SwingAnalyzer::new(AnalysisConfig::default()).with_phase_source(FixedPhases);
        let result = analyzer.analyze(&frames, None).unwrap();
        assert_eq!(result.metadata.phase_source, "fixed");
        assert_eq!(result.metadata.methods_used[0], "phases:fixed");
        assert_eq!(result.phases.len(), 6);
    }

    #[test]
    fn test_metadata() {
        let frames = SyntheticSwing::default().generate();
        let result = analyze_swing(&frames, None, &AnalysisConfig::default()).unwrap();
        assert_eq!(result.metadata.frame_count, 150);
        assert!((result.metadata.duration_ms - 149.0 * 1000.0 / 30.0).abs() < 0.5);
        assert_eq!(result.metadata.algorithm_version, env!("CARGO_PKG_VERSION"));
    }
}
