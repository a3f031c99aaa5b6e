//! Impact consensus detector
//!
//! Runs the four impact methods independently and merges their frames with
//! [`weighted_consensus`].
//!
//! # Algorithm
//!
//! 1. Run every method; a method that fails contributes a neutral
//!    zero-confidence result and a discrepancy note, never an abort
//! 2. Consensus frame = confidence-weighted mean of the successful methods'
//!    frames, falling back to the first successful frame when every weight is 0
//! 3. Agreement = `max(0, 1 - MAD / (maxDev + 1))` over the successful methods
//! 4. Confidence = mean of all four confidences × agreement
//! 5. Round and clamp the frame to `[0, N-1]`
//!
//! With fewer than `min_samples` path points every method is neutral, and the
//! result reports frame 0 with confidence 0.
//!
//! # Example
//!
//! ```
//! use stratum_swing::config::AnalysisConfig;
//! use stratum_swing::features::club_path::estimate_path;
//! use stratum_swing::features::impact::detect_impact;
//! use stratum_swing::pose::synthetic::SyntheticSwing;
//!
//! let frames = SyntheticSwing::default().generate();
//! let timestamps: Vec<f32> = frames.iter().map(|f| f.timestamp_ms).collect();
//! let config = AnalysisConfig::default();
//! let path = estimate_path(&frames, &timestamps, None, &config);
//! let impact = detect_impact(&frames, &path, None, &config);
//! assert!(impact.frame >= 105 && impact.frame <= 112);
//! ```

use super::{
    club_speed, dynamics, lowest_point, weight_transfer, ImpactCorroboration,
    ImpactDetectionResult, ImpactMethod, MethodResult,
};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::club_path::ClubPath;
use crate::features::consensus::{weighted_consensus, Estimate};
use crate::pose::landmark::PoseFrame;

/// Detect the impact frame by multi-method consensus
///
/// # Arguments
///
/// * `frames` - Pose sequence
/// * `path` - Estimated club-head path for the same sequence
/// * `corroboration` - Optional external impact signal
/// * `config` - Analysis configuration
///
/// # Returns
///
/// An [`ImpactDetectionResult`]; never fails.
pub fn detect_impact(
    frames: &[PoseFrame],
    path: &ClubPath,
    corroboration: Option<&ImpactCorroboration>,
    config: &AnalysisConfig,
) -> ImpactDetectionResult {
    let impact_config = &config.impact;
    log::debug!(
        "Detecting impact: {} frames, {} path points",
        frames.len(),
        path.len()
    );

    let mut notes = Vec::new();

    if path.len() < impact_config.min_samples {
        log::warn!(
            "Impact detection skipped: {} usable samples (need {})",
            path.len(),
            impact_config.min_samples
        );
        notes.push(
            AnalysisError::insufficient("impact detection", impact_config.min_samples, path.len())
                .to_string(),
        );
        return ImpactDetectionResult {
            frame: 0,
            confidence: 0.0,
            agreement: 0.0,
            methods: ImpactMethod::ALL
                .iter()
                .map(|&m| MethodResult::neutral(m))
                .collect(),
            notes,
        };
    }

    let outcomes: Vec<(ImpactMethod, Result<MethodResult, AnalysisError>)> = vec![
        (
            ImpactMethod::PeakClubSpeed,
            club_speed::detect(path, impact_config),
        ),
        (
            ImpactMethod::WeightTransfer,
            weight_transfer::detect(frames, config.min_visibility, impact_config),
        ),
        (
            ImpactMethod::LowestClubPosition,
            lowest_point::detect(path, impact_config),
        ),
        (
            ImpactMethod::PeakDynamics,
            dynamics::detect(path, impact_config),
        ),
    ];

    let mut methods = Vec::with_capacity(outcomes.len());
    let mut estimates = Vec::with_capacity(outcomes.len());
    for (method, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                estimates.push(Estimate::new(result.frame as f32, result.confidence));
                methods.push(result);
            }
            Err(e) => {
                log::warn!("Impact method {:?} failed: {}", method, e);
                notes.push(format!("{:?}: {}", method, e));
                methods.push(MethodResult::neutral(method));
            }
        }
    }

    let mean_confidence =
        methods.iter().map(|m| m.confidence).sum::<f32>() / methods.len() as f32;

    let last_frame = frames.len().saturating_sub(1);
    let (frame, agreement) = match weighted_consensus(&estimates) {
        Some(consensus) => (
            (consensus.value.round().max(0.0) as usize).min(last_frame),
            consensus.agreement,
        ),
        None => {
            notes.push("No impact method produced an estimate".to_string());
            (0, 0.0)
        }
    };
    let confidence = (mean_confidence * agreement).clamp(0.0, 1.0);

    for m in methods.iter().filter(|m| m.confidence > 0.0) {
        let gap = m.frame.abs_diff(frame);
        if gap > impact_config.corroboration_tolerance {
            notes.push(format!(
                "{:?} places impact at frame {} ({} frames from consensus)",
                m.method, m.frame, gap
            ));
        }
    }

    if let Some(external) = corroboration {
        let gap = external.frame.abs_diff(frame);
        if gap > impact_config.corroboration_tolerance {
            notes.push(format!(
                "External signal (strength {:.2}) places impact at frame {}, {} frames from consensus frame {}",
                external.strength, external.frame, gap, frame
            ));
        } else {
            log::debug!("External signal corroborates impact frame {}", frame);
        }
    }

    log::debug!(
        "Impact consensus: frame {} (confidence {:.3}, agreement {:.3})",
        frame,
        confidence,
        agreement
    );

    ImpactDetectionResult {
        frame,
        confidence,
        agreement,
        methods,
        notes,
    }
}
