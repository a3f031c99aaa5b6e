//! Impact frame detection
//!
//! Four independent methods with consensus voting:
//! - Peak club-head speed
//! - Weight-transfer inflection (hip/knee lateral shift)
//! - Lowest club-head position
//! - Peak club-head dynamics (acceleration)
//! - Confidence-weighted consensus

pub mod club_speed;
pub mod detector;
pub mod dynamics;
pub mod lowest_point;
pub mod weight_transfer;

use serde::{Deserialize, Serialize};

pub use detector::detect_impact;

/// Impact estimation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactMethod {
    /// Frame of maximum club-head speed
    PeakClubSpeed,
    /// Frame of maximum combined hip/knee lateral shift
    WeightTransfer,
    /// Frame where the club head is lowest on screen
    LowestClubPosition,
    /// Frame of maximum club-head acceleration
    PeakDynamics,
}

impl ImpactMethod {
    /// All methods in evaluation order
    pub const ALL: [ImpactMethod; 4] = [
        ImpactMethod::PeakClubSpeed,
        ImpactMethod::WeightTransfer,
        ImpactMethod::LowestClubPosition,
        ImpactMethod::PeakDynamics,
    ];
}

/// Result of a single impact method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodResult {
    /// Method that produced this result
    pub method: ImpactMethod,

    /// Estimated impact frame
    pub frame: usize,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,

    /// Raw metric behind the estimate (speed, shift, variance, acceleration)
    pub raw_metric: f32,
}

impl MethodResult {
    /// Zero-confidence result used when a method cannot run
    pub fn neutral(method: ImpactMethod) -> Self {
        Self {
            method,
            frame: 0,
            confidence: 0.0,
            raw_metric: 0.0,
        }
    }
}

/// Externally supplied evidence of the impact frame
///
/// Produced by a collaborator (for example, a decoded-video contact detector);
/// the engine itself never decodes media.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactCorroboration {
    /// Frame the external signal places impact at
    pub frame: usize,
    /// Strength of the external signal (0.0-1.0)
    pub strength: f32,
}

/// Consensus impact estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactDetectionResult {
    /// Consensus impact frame, in `[0, N-1]`
    pub frame: usize,

    /// Overall confidence: mean method confidence times agreement (0.0-1.0)
    pub confidence: f32,

    /// Agreement between the contributing methods (0.0-1.0)
    pub agreement: f32,

    /// The four method results, in [`ImpactMethod::ALL`] order
    pub methods: Vec<MethodResult>,

    /// Discrepancy and failure notes
    pub notes: Vec<String>,
}

impl ImpactDetectionResult {
    /// Result of a named method, if present
    pub fn method(&self, method: ImpactMethod) -> Option<&MethodResult> {
        self.methods.iter().find(|m| m.method == method)
    }
}
