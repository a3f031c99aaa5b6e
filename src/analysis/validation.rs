//! Result validation
//!
//! Cross-checks the outputs of the segmenter, impact detector, club-path
//! estimator and scorer for physical plausibility and internal consistency.
//!
//! Errors mark a result as unusable; warnings mark it as usable with reduced
//! confidence. The reliability scalar combines:
//! - Inverse error/warning count
//! - Sample-size adequacy
//! - Phase, impact and path confidences
//! - Mean landmark visibility

use serde::{Deserialize, Serialize};

use super::confidence::compute_confidence;
use super::result::AnalysisFlag;
use super::scoring::{tempo_ratio, SwingMetrics};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::club_path::ClubPath;
use crate::features::impact::ImpactDetectionResult;
use crate::features::phase::{find_phase, Phase, PhaseName};
use crate::pose::landmark::PoseFrame;

/// Frame count at which sample size stops limiting reliability
const ADEQUATE_FRAMES: usize = 30;

/// Relative tolerance between the scored tempo and the phase durations
const TEMPO_TOLERANCE: f32 = 0.05;

/// Frames the impact estimate may sit away from the impact phase
const IMPACT_PHASE_TOLERANCE: usize = 10;

/// Club-path confidence below which a warning is raised
const MIN_PATH_CONFIDENCE: f32 = 0.3;

/// Mean visibility below which a warning is raised
const MIN_MEAN_VISIBILITY: f32 = 0.5;

/// Coarse reliability grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReliabilityGrade {
    /// Reliability >= 0.75 and no errors
    High,
    /// Reliability >= 0.5 and no errors
    Medium,
    /// Reliability >= 0.25 and no errors
    Low,
    /// Any error, or reliability < 0.25
    Unusable,
}

impl ReliabilityGrade {
    fn from_report(reliability: f32, has_errors: bool) -> Self {
        if has_errors || reliability < 0.25 {
            ReliabilityGrade::Unusable
        } else if reliability >= 0.75 {
            ReliabilityGrade::High
        } else if reliability >= 0.5 {
            ReliabilityGrade::Medium
        } else {
            ReliabilityGrade::Low
        }
    }
}

/// Validation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Problems that make the result unusable
    pub errors: Vec<String>,
    /// Problems that reduce confidence
    pub warnings: Vec<String>,
    /// Reliability scalar (0.0-1.0)
    pub reliability: f32,
    /// Grade derived from `reliability` and `errors`
    pub grade: ReliabilityGrade,
    /// Flags raised by the checks
    pub flags: Vec<AnalysisFlag>,
}

impl ValidationReport {
    /// Whether no error was found
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
    flags: Vec<AnalysisFlag>,
}

impl Findings {
    fn flag(&mut self, flag: AnalysisFlag) {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }
}

/// Validate a complete set of component outputs
///
/// # Arguments
///
/// * `frames` - Input pose frames
/// * `metrics` - Scored metrics
/// * `phases` - Segmented phases
/// * `impact` - Consensus impact estimate
/// * `club_path` - Estimated club path
/// * `config` - Analysis configuration
///
/// # Returns
///
/// A report with errors, warnings, flags and a reliability grade
pub fn validate(
    frames: &[PoseFrame],
    metrics: &SwingMetrics,
    phases: &[Phase],
    impact: &ImpactDetectionResult,
    club_path: &ClubPath,
    config: &AnalysisConfig,
) -> ValidationReport {
    log::debug!(
        "Validating analysis: {} frames, {} phases",
        frames.len(),
        phases.len()
    );

    let n = frames.len();
    let mut findings = Findings::default();

    check_phases(phases, n, &mut findings);
    check_metric_bounds(metrics, &mut findings);
    check_tempo_consistency(metrics, phases, &mut findings);

    // Sample size
    let min_frames = config.segmentation.min_frames;
    if n < min_frames {
        findings.warnings.push(AnalysisError::insufficient("phase segmenter", min_frames, n).to_string());
        findings.flag(AnalysisFlag::InsufficientData);
    } else if n < ADEQUATE_FRAMES {
        findings.warnings.push(format!(
            "Low sample count: {} frames (at least {} recommended)",
            n, ADEQUATE_FRAMES
        ));
    }
    if club_path.len() < config.impact.min_samples {
        findings.warnings.push(
            AnalysisError::insufficient("impact detector", config.impact.min_samples, club_path.len())
                .to_string(),
        );
        findings.flag(AnalysisFlag::InsufficientData);
    }

    // Landmark visibility
    let visibility = if n == 0 {
        0.0
    } else {
        frames.iter().map(|f| f.mean_visibility()).sum::<f32>() / n as f32
    };
    if visibility < MIN_MEAN_VISIBILITY {
        findings.warnings.push(format!(
            "Low landmark visibility: mean {:.2} (below {:.2})",
            visibility, MIN_MEAN_VISIBILITY
        ));
        findings.flag(AnalysisFlag::LowVisibility);
    }
    if club_path.skipped_frames > 0
        || impact.notes.iter().any(|note| note.contains("Invalid landmarks"))
    {
        findings.flag(AnalysisFlag::InvalidLandmarks);
    }

    // Impact against the impact phase
    if impact.confidence > 0.0 {
        if let Some(phase) = find_phase(phases, PhaseName::Impact) {
            let distance = impact.frame.abs_diff(phase.start_frame);
            if distance > IMPACT_PHASE_TOLERANCE {
                findings.warnings.push(format!(
                    "Impact frame {} is {} frames from the impact phase start {}",
                    impact.frame, distance, phase.start_frame
                ));
                findings.flag(AnalysisFlag::ImpactDisagreement);
            }
        }
    }

    if club_path.confidence < MIN_PATH_CONFIDENCE {
        findings.warnings.push(format!(
            "Low club path confidence: {:.2}",
            club_path.confidence
        ));
    }
    if club_path.calibration_used {
        findings.flag(AnalysisFlag::PathRecalibrated);
    }

    let confidence = compute_confidence(phases, impact, club_path);
    for flag in &confidence.flags {
        findings.flag(*flag);
    }

    // Reliability
    let sample_adequacy = if n < min_frames {
        0.0
    } else {
        (n as f32 / ADEQUATE_FRAMES as f32).min(1.0)
    };
    let count_factor = 1.0
        / (1.0 + findings.errors.len() as f32 + 0.25 * findings.warnings.len() as f32);
    let mut reliability = (0.25 * count_factor
        + 0.15
            * (sample_adequacy
                + confidence.phase_confidence
                + confidence.impact_confidence
                + confidence.path_confidence
                + visibility.clamp(0.0, 1.0)))
        * sample_adequacy;
    if !findings.errors.is_empty() {
        reliability *= 0.5;
    }
    let reliability = reliability.clamp(0.0, 1.0);
    let grade = ReliabilityGrade::from_report(reliability, !findings.errors.is_empty());

    for error in &findings.errors {
        log::warn!("Validation error: {}", error);
    }

    log::debug!(
        "Validation complete: {} errors, {} warnings, reliability {:.3} ({:?})",
        findings.errors.len(),
        findings.warnings.len(),
        reliability,
        grade
    );

    ValidationReport {
        errors: findings.errors,
        warnings: findings.warnings,
        reliability,
        grade,
        flags: findings.flags,
    }
}

fn check_phases(phases: &[Phase], n: usize, findings: &mut Findings) {
    let before = findings.errors.len();

    if phases.len() != PhaseName::ALL.len() {
        findings.errors.push(format!(
            "Expected {} phases, got {}",
            PhaseName::ALL.len(),
            phases.len()
        ));
    }

    for (phase, expected) in phases.iter().zip(PhaseName::ALL.iter()) {
        if phase.name != *expected {
            findings.errors.push(format!(
                "Phase order broken: expected {}, found {}",
                expected.name(),
                phase.name.name()
            ));
        }
    }

    if let Some(first) = phases.first() {
        if first.start_frame != 0 {
            findings
                .errors
                .push(format!("First phase starts at frame {}, not 0", first.start_frame));
        }
    }
    if let Some(last) = phases.last() {
        if last.end_frame != n {
            findings.errors.push(format!(
                "Last phase ends at frame {}, not {}",
                last.end_frame, n
            ));
        }
    }

    for pair in phases.windows(2) {
        if pair[1].start_frame != pair[0].end_frame {
            findings.errors.push(format!(
                "Phases {} and {} are not contiguous ({} vs {})",
                pair[0].name.name(),
                pair[1].name.name(),
                pair[0].end_frame,
                pair[1].start_frame
            ));
        }
    }

    for phase in phases {
        if phase.end_frame < phase.start_frame {
            findings.errors.push(format!(
                "Phase {} ends before it starts ({} < {})",
                phase.name.name(),
                phase.end_frame,
                phase.start_frame
            ));
        } else if phase.frame_count() == 0 {
            findings
                .errors
                .push(format!("Phase {} has zero duration", phase.name.name()));
        }
        if phase.duration_ms < 0.0 || !phase.duration_ms.is_finite() {
            findings.errors.push(format!(
                "Phase {} has an invalid duration of {} ms",
                phase.name.name(),
                phase.duration_ms
            ));
        }
    }

    if findings.errors.len() > before {
        findings.flag(AnalysisFlag::PhaseInconsistency);
    }
}

fn check_metric_bounds(metrics: &SwingMetrics, findings: &mut Findings) {
    for (kind, value) in metrics.raw_values() {
        let bounds = kind.physical_bounds();
        if !value.is_finite() {
            findings
                .errors
                .push(format!("Metric {} is not finite", kind.name()));
            findings.flag(AnalysisFlag::ImplausibleMetric);
        } else if !bounds.contains(value) {
            let message = format!(
                "Metric {} = {:.2} outside physical range [{}, {}]",
                kind.name(),
                value,
                bounds.min,
                bounds.max
            );
            if bounds.hard {
                findings.errors.push(message);
            } else {
                findings.warnings.push(message);
            }
            findings.flag(AnalysisFlag::ImplausibleMetric);
        }
    }

    let missing = metrics.missing_metrics();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|k| k.name()).collect();
        findings
            .warnings
            .push(format!("Unmeasured metrics: {}", names.join(", ")));
    }
}

fn check_tempo_consistency(metrics: &SwingMetrics, phases: &[Phase], findings: &mut Findings) {
    let duration = |name: PhaseName| find_phase(phases, name).map_or(0.0, |p| p.duration_ms);
    let recomputed = tempo_ratio(duration(PhaseName::Backswing), duration(PhaseName::Downswing));

    match (metrics.tempo.ratio, recomputed) {
        (Some(scored), Some(expected)) => {
            if (scored - expected).abs() > TEMPO_TOLERANCE * expected {
                findings.errors.push(format!(
                    "Tempo ratio {:.3} does not match phase durations ({:.3})",
                    scored, expected
                ));
            }
        }
        (Some(scored), None) => findings.errors.push(format!(
            "Tempo ratio {:.3} reported without usable backswing/downswing phases",
            scored
        )),
        (None, Some(expected)) => findings.warnings.push(format!(
            "Tempo ratio missing although phase durations give {:.3}",
            expected
        )),
        (None, None) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scoring::score;
    use crate::features::club_path::estimate_path;
    use crate::features::impact::detect_impact;
    use crate::features::phase::segment;
    use crate::pose::synthetic::SyntheticSwing;
    use crate::pose::trajectory::extract_trajectory;

    struct Run {
        frames: Vec<PoseFrame>,
        phases: Vec<Phase>,
        path: ClubPath,
        impact: ImpactDetectionResult,
        metrics: SwingMetrics,
    }

    fn run(swing: &SyntheticSwing, config: &AnalysisConfig) -> Run {
        let frames = swing.generate();
        let stamps: Vec<f32> = frames.iter().map(|f| f.timestamp_ms).collect();
        let trajectory = extract_trajectory(
            &frames,
            config.segmentation.tracked_point,
            config.handedness,
            config.min_visibility,
        );
        let phases = segment(&frames, &trajectory, &stamps, config);
        let path = estimate_path(&frames, &stamps, None, config);
        let impact = detect_impact(&frames, &path, None, config);
        let metrics = score(&phases, &frames, &path, &stamps, config);
        Run {
            frames,
            phases,
            path,
            impact,
            metrics,
        }
    }

    fn check(r: &Run, config: &AnalysisConfig) -> ValidationReport {
        validate(&r.frames, &r.metrics, &r.phases, &r.impact, &r.path, config)
    }

    #[test]
    fn test_clean_swing_is_usable() {
        let config = AnalysisConfig::default();
        let r = run(&SyntheticSwing::default(), &config);
        let report = check(&r, &config);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.reliability > 0.5, "reliability {}", report.reliability);
        assert_ne!(report.grade, ReliabilityGrade::Unusable);
        assert!(!report.flags.contains(&AnalysisFlag::InsufficientData));
    }

    #[test]
    fn test_short_sequence_is_insufficient() {
        let config = AnalysisConfig::default();
        let r = run(&SyntheticSwing::with_frames(3), &config);
        let report = check(&r, &config);
        assert!(report.warnings.iter().any(|w| w.contains("Insufficient data")));
        assert!(report.flags.contains(&AnalysisFlag::InsufficientData));
        assert_eq!(report.reliability, 0.0);
        assert_eq!(report.grade, ReliabilityGrade::Unusable);
    }

    #[test]
    fn test_tempo_mismatch_is_an_error() {
        let config = AnalysisConfig::default();
        let mut r = run(&SyntheticSwing::default(), &config);
        let real = r.metrics.tempo.ratio.unwrap();
        r.metrics.tempo.ratio = Some(real * 1.5);
        let report = check(&r, &config);
        assert!(report.errors.iter().any(|e| e.contains("Tempo ratio")));
        assert_eq!(report.grade, ReliabilityGrade::Unusable);
    }

    #[test]
    fn test_out_of_bounds_metrics() {
        let config = AnalysisConfig::default();
        let mut r = run(&SyntheticSwing::default(), &config);
        r.metrics.rotation.shoulder_turn_deg = Some(200.0);
        r.metrics.weight_transfer.impact_lead_pct = Some(f32::NAN);
        let report = check(&r, &config);
        assert!(report.errors.iter().any(|e| e.contains("shoulder turn")));
        assert!(report.errors.iter().any(|e| e.contains("not finite")));
        assert!(report.flags.contains(&AnalysisFlag::ImplausibleMetric));
    }

    #[test]
    fn test_soft_bound_is_a_warning() {
        let config = AnalysisConfig::default();
        let mut r = run(&SyntheticSwing::default(), &config);
        // Keep the tempo consistent with the phases by lengthening the backswing
        let down = r.phases[3].duration_ms;
        r.phases[1].duration_ms = down * 6.0;
        r.metrics.tempo.ratio = Some(6.0);
        let report = check(&r, &config);
        assert!(report.warnings.iter().any(|w| w.contains("tempo ratio")));
        assert!(!report.errors.iter().any(|e| e.contains("tempo ratio")));
    }

    #[test]
    fn test_broken_phases() {
        let config = AnalysisConfig::default();
        let mut r = run(&SyntheticSwing::default(), &config);
        r.phases[2].start_frame += 1;
        r.phases.swap(4, 5);
        let report = check(&r, &config);
        assert!(report.errors.iter().any(|e| e.contains("not contiguous")));
        assert!(report.errors.iter().any(|e| e.contains("Phase order")));
        assert!(report.flags.contains(&AnalysisFlag::PhaseInconsistency));
    }

    #[test]
    fn test_low_visibility_warning() {
        let config = AnalysisConfig {
            min_visibility: 0.2,
            ..AnalysisConfig::default()
        };
        let r = run(&SyntheticSwing::default().visibility(0.3), &config);
        let report = check(&r, &config);
        assert!(report.flags.contains(&AnalysisFlag::LowVisibility));
        assert!(report.warnings.iter().any(|w| w.contains("visibility")));
    }

    #[test]
    fn test_reliability_grades() {
        assert_eq!(ReliabilityGrade::from_report(0.9, false), ReliabilityGrade::High);
        assert_eq!(ReliabilityGrade::from_report(0.6, false), ReliabilityGrade::Medium);
        assert_eq!(ReliabilityGrade::from_report(0.3, false), ReliabilityGrade::Low);
        assert_eq!(ReliabilityGrade::from_report(0.9, true), ReliabilityGrade::Unusable);
    }
}
