//! Confidence scoring module
//!
//! Combines the phase, impact and club-path confidences into an overall
//! assessment of analysis quality.
//!
//! # Confidence Components
//!
//! 1. **Phase Confidence**: Mean of the six per-phase heuristic confidences
//! 2. **Impact Confidence**: Mean method confidence times method agreement
//! 3. **Path Confidence**: Club-path smoothness, continuity and point confidence
//! 4. **Overall Confidence**: Weighted combination of all components
//!
//! # Example
//!
//! ```
//! use stratum_swing::{analyze_swing, AnalysisConfig};
//! use stratum_swing::analysis::confidence::compute_confidence;
//! use stratum_swing::pose::synthetic::SyntheticSwing;
//!
//! let frames = SyntheticSwing::default().generate();
//! let result = analyze_swing(&frames, None, &AnalysisConfig::default())?;
//! let confidence = compute_confidence(&result.phases, &result.impact, &result.club_path);
//!
//! println!("Overall confidence: {:.2}", confidence.overall_confidence);
//! # Ok::<(), stratum_swing::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};

use super::result::AnalysisFlag;
use crate::features::club_path::ClubPath;
use crate::features::consensus::clamp_confidence;
use crate::features::impact::ImpactDetectionResult;
use crate::features::phase::Phase;

/// Analysis confidence scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfidence {
    /// Phase confidence (0.0-1.0)
    ///
    /// Mean of the per-phase heuristic weights, already scaled down for
    /// fallback boundaries and occluded tracking.
    pub phase_confidence: f32,

    /// Impact confidence (0.0-1.0)
    pub impact_confidence: f32,

    /// Club-path confidence (0.0-1.0)
    pub path_confidence: f32,

    /// Overall confidence (weighted average)
    ///
    /// - Phases: 40% weight
    /// - Impact: 30% weight
    /// - Path: 30% weight
    pub overall_confidence: f32,

    /// Confidence flags indicating specific issues
    pub flags: Vec<AnalysisFlag>,
}

/// Compute confidence scores for the component results
///
/// # Arguments
///
/// * `phases` - Segmented phases
/// * `impact` - Consensus impact estimate
/// * `path` - Estimated club path
///
/// # Returns
///
/// `AnalysisConfidence` with individual and overall confidence scores
///
/// # Algorithm
///
/// When every component produced evidence the overall score is the weighted
/// average. When some component failed (confidence 0) the mean of the
/// surviving components is used with a 0.6 penalty. When all failed it is 0.
pub fn compute_confidence(
    phases: &[Phase],
    impact: &ImpactDetectionResult,
    path: &ClubPath,
) -> AnalysisConfidence {
    log::debug!("Computing confidence scores for swing analysis");

    let phase_confidence = if phases.is_empty() {
        0.0
    } else {
        clamp_confidence(phases.iter().map(|p| p.confidence).sum::<f32>() / phases.len() as f32)
    };
    let impact_confidence = clamp_confidence(impact.confidence);
    let path_confidence = clamp_confidence(path.confidence);

    let components = [phase_confidence, impact_confidence, path_confidence];
    let surviving: Vec<f32> = components.iter().copied().filter(|c| *c > 0.0).collect();

    let overall_confidence = if surviving.len() == components.len() {
        (phase_confidence * 0.4 + impact_confidence * 0.3 + path_confidence * 0.3).clamp(0.0, 1.0)
    } else if !surviving.is_empty() {
        surviving.iter().sum::<f32>() / surviving.len() as f32 * 0.6
    } else {
        0.0
    };

    let mut flags = Vec::new();
    if overall_confidence < 0.5 {
        flags.push(AnalysisFlag::LowConfidence);
    }
    if impact_confidence > 0.0 && impact.agreement < 0.5 {
        flags.push(AnalysisFlag::ImpactDisagreement);
    }

    log::debug!(
        "Confidence scores: Phases={:.3}, Impact={:.3}, Path={:.3}, Overall={:.3}",
        phase_confidence,
        impact_confidence,
        path_confidence,
        overall_confidence
    );

    AnalysisConfidence {
        phase_confidence,
        impact_confidence,
        path_confidence,
        overall_confidence,
        flags,
    }
}

impl AnalysisConfidence {
    /// Check if overall confidence is high (>= 0.7)
    pub fn is_high_confidence(&self) -> bool {
        self.overall_confidence >= 0.7
    }

    /// Check if overall confidence is low (< 0.5)
    pub fn is_low_confidence(&self) -> bool {
        self.overall_confidence < 0.5
    }

    /// Check if overall confidence is medium (0.5-0.7)
    pub fn is_medium_confidence(&self) -> bool {
        self.overall_confidence >= 0.5 && self.overall_confidence < 0.7
    }

    /// Get a human-readable confidence level description
    ///
    /// # Returns
    ///
    /// "High", "Medium", or "Low"
    pub fn confidence_level(&self) -> &'static str {
        if self.is_high_confidence() {
            "High"
        } else if self.is_low_confidence() {
            "Low"
        } else {
            "Medium"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::impact::{ImpactMethod, MethodResult};
    use crate::features::phase::{PhaseDetail, PhaseMetrics, PhaseName};

    fn phases_with(confidence: f32) -> Vec<Phase> {
        PhaseName::ALL
            .iter()
            .enumerate()
            .map(|(i, &name)| Phase {
                name,
                start_frame: i * 10,
                end_frame: (i + 1) * 10,
                start_time_ms: i as f32 * 100.0,
                end_time_ms: (i + 1) as f32 * 100.0,
                duration_ms: 100.0,
                confidence,
                metrics: PhaseMetrics::default(),
                detail: PhaseDetail::Top { x_factor_deg: None },
            })
            .collect()
    }

    fn impact_with(confidence: f32, agreement: f32) -> ImpactDetectionResult {
        ImpactDetectionResult {
            frame: 40,
            confidence,
            agreement,
            methods: ImpactMethod::ALL.iter().map(|&m| MethodResult::neutral(m)).collect(),
            notes: vec![],
        }
    }

    fn path_with(confidence: f32) -> ClubPath {
        ClubPath {
            confidence,
            ..ClubPath::default()
        }
    }

    #[test]
    fn test_compute_confidence_all_good() {
        let confidence =
            compute_confidence(&phases_with(0.8), &impact_with(0.9, 0.95), &path_with(0.7));

        assert!((confidence.phase_confidence - 0.8).abs() < 1e-6);
        assert_eq!(confidence.impact_confidence, 0.9);
        assert_eq!(confidence.path_confidence, 0.7);

        // 0.8*0.4 + 0.9*0.3 + 0.7*0.3 = 0.32 + 0.27 + 0.21 = 0.80
        assert!((confidence.overall_confidence - 0.80).abs() < 0.01);
        assert!(confidence.flags.is_empty());
    }

    #[test]
    fn test_compute_confidence_impact_failed() {
        let confidence =
            compute_confidence(&phases_with(0.8), &impact_with(0.0, 0.0), &path_with(0.6));

        // Surviving mean (0.8 + 0.6) / 2 = 0.7, times 0.6 = 0.42
        assert!((confidence.overall_confidence - 0.42).abs() < 0.01);
        assert!(confidence.flags.contains(&AnalysisFlag::LowConfidence));
        assert!(!confidence.flags.contains(&AnalysisFlag::ImpactDisagreement));
    }

    #[test]
    fn test_compute_confidence_all_failed() {
        let confidence = compute_confidence(&[], &impact_with(0.0, 0.0), &path_with(0.0));
        assert_eq!(confidence.overall_confidence, 0.0);
        assert_eq!(confidence.confidence_level(), "Low");
    }

    #[test]
    fn test_compute_confidence_clamping() {
        let confidence =
            compute_confidence(&phases_with(1.5), &impact_with(-0.5, 1.0), &path_with(2.0));
        assert!(confidence.phase_confidence <= 1.0);
        assert!(confidence.impact_confidence >= 0.0);
        assert!(confidence.path_confidence <= 1.0);
        assert!((0.0..=1.0).contains(&confidence.overall_confidence));
    }

    #[test]
    fn test_disagreement_flag() {
        let confidence =
            compute_confidence(&phases_with(0.8), &impact_with(0.3, 0.2), &path_with(0.7));
        assert!(confidence.flags.contains(&AnalysisFlag::ImpactDisagreement));
    }

    #[test]
    fn test_confidence_helper_methods() {
        let high = compute_confidence(&phases_with(0.9), &impact_with(0.9, 1.0), &path_with(0.9));
        assert!(high.is_high_confidence());
        assert!(!high.is_low_confidence());
        assert!(!high.is_medium_confidence());
        assert_eq!(high.confidence_level(), "High");

        let medium =
            compute_confidence(&phases_with(0.6), &impact_with(0.6, 1.0), &path_with(0.6));
        assert!(medium.is_medium_confidence());
        assert_eq!(medium.confidence_level(), "Medium");
    }
}
