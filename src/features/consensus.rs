//! Confidence-weighted consensus
//!
//! Merges several independent estimates of the same quantity into one value
//! plus an agreement score. Used to combine the four impact-frame methods and
//! the three club-head position candidates.
//!
//! # Algorithm
//!
//! 1. Weighted mean `v = Σ(vᵢ·cᵢ) / Σcᵢ`, falling back to the first estimate's
//!    value when the total weight is zero
//! 2. Mean absolute deviation `MAD = mean(|vᵢ - v|)` and maximum deviation
//!    `maxDev = max(|vᵢ - v|)`
//! 3. Agreement `max(0, 1 - MAD / (maxDev + 1))`
//!
//! # Example
//!
//! ```
//! use stratum_swing::features::consensus::{weighted_consensus, Estimate};
//!
//! let estimates = [Estimate::new(100.0, 0.9), Estimate::new(104.0, 0.3)];
//! let consensus = weighted_consensus(&estimates).unwrap();
//! assert!((consensus.value - 101.0).abs() < 1e-4);
//! assert!(consensus.agreement > 0.0 && consensus.agreement <= 1.0);
//! ```

use serde::{Deserialize, Serialize};

/// One estimate with its confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Estimated value
    pub value: f32,
    /// Confidence in [0, 1]
    pub confidence: f32,
}

impl Estimate {
    /// Create an estimate
    pub const fn new(value: f32, confidence: f32) -> Self {
        Self { value, confidence }
    }
}

/// Result of merging estimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Consensus {
    /// Merged value
    pub value: f32,
    /// Agreement between estimates in [0, 1]
    pub agreement: f32,
    /// Sum of (clamped) confidences
    pub total_weight: f32,
    /// Mean of (clamped) confidences
    pub mean_confidence: f32,
}

/// Merge estimates into a confidence-weighted value and agreement score
///
/// Confidences are clamped to [0, 1]; non-finite estimates are ignored.
/// Returns `None` when no finite estimate is supplied.
pub fn weighted_consensus(estimates: &[Estimate]) -> Option<Consensus> {
    let usable: Vec<Estimate> = estimates
        .iter()
        .filter(|e| e.value.is_finite())
        .map(|e| Estimate::new(e.value, clamp_confidence(e.confidence)))
        .collect();

    let first = usable.first()?;

    let total_weight: f32 = usable.iter().map(|e| e.confidence).sum();
    let value = if total_weight > 0.0 {
        usable.iter().map(|e| e.value * e.confidence).sum::<f32>() / total_weight
    } else {
        log::trace!("Consensus total weight is zero, using first estimate");
        first.value
    };

    let deviations: Vec<f32> = usable.iter().map(|e| (e.value - value).abs()).collect();
    let mean_deviation = deviations.iter().sum::<f32>() / deviations.len() as f32;
    let max_deviation = deviations.iter().copied().fold(0.0f32, f32::max);
    let agreement = (1.0 - mean_deviation / (max_deviation + 1.0)).max(0.0);

    Some(Consensus {
        value,
        agreement,
        total_weight,
        mean_confidence: total_weight / usable.len() as f32,
    })
}

/// Clamp a confidence into [0, 1], mapping non-finite values to 0
pub fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_estimates_agree_fully() {
        let estimates = [Estimate::new(50.0, 0.8), Estimate::new(50.0, 0.4)];
        let c = weighted_consensus(&estimates).unwrap();
        assert!((c.value - 50.0).abs() < 1e-6);
        assert!((c.agreement - 1.0).abs() < 1e-6);
        assert!((c.mean_confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_zero_weight_falls_back_to_first() {
        let estimates = [Estimate::new(12.0, 0.0), Estimate::new(40.0, 0.0)];
        let c = weighted_consensus(&estimates).unwrap();
        assert_eq!(c.value, 12.0);
        assert_eq!(c.total_weight, 0.0);
    }

    #[test]
    fn test_disagreement_lowers_agreement() {
        let close = [Estimate::new(100.0, 1.0), Estimate::new(102.0, 1.0)];
        let far = [Estimate::new(60.0, 1.0), Estimate::new(140.0, 1.0)];
        let c_close = weighted_consensus(&close).unwrap();
        let c_far = weighted_consensus(&far).unwrap();
        assert!(c_far.agreement < c_close.agreement);
        assert!(c_far.agreement >= 0.0);
    }

    #[test]
    fn test_empty_and_non_finite() {
        assert!(weighted_consensus(&[]).is_none());
        assert!(weighted_consensus(&[Estimate::new(f32::NAN, 1.0)]).is_none());
        let c = weighted_consensus(&[Estimate::new(f32::NAN, 1.0), Estimate::new(3.0, 0.5)]).unwrap();
        assert_eq!(c.value, 3.0);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let c = weighted_consensus(&[Estimate::new(1.0, 5.0), Estimate::new(3.0, -2.0)]).unwrap();
        assert_eq!(c.value, 1.0);
        assert_eq!(c.total_weight, 1.0);
    }
}
