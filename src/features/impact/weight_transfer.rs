//! Weight-transfer inflection
//!
//! The lateral drive of hips and knees toward the target peaks as the club
//! arrives at the ball. For each pair of consecutive frames where both hip and
//! knee centers are visible, the combined shift `|Δx_hip| + |Δx_knee|` is
//! computed; impact is the later frame of the largest shift.
//!
//! Confidence: `min(1, shift / expected_shift)`

use super::{ImpactMethod, MethodResult};
use crate::config::ImpactConfig;
use crate::error::AnalysisError;
use crate::pose::geometry::Point3;
use crate::pose::landmark::{Joint, PoseFrame};

/// Estimate impact from the largest lateral hip/knee shift
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientData`] when fewer than
/// `config.min_samples` frames have visible hips and knees, and
/// [`AnalysisError::InvalidLandmarks`] when no consecutive pair of such frames
/// exists.
pub fn detect(
    frames: &[PoseFrame],
    min_visibility: f32,
    config: &ImpactConfig,
) -> Result<MethodResult, AnalysisError> {
    let centers: Vec<Option<(Point3, Point3)>> = frames
        .iter()
        .map(|f| {
            let hip = f.joint_center(Joint::Hip, min_visibility)?;
            let knee = f.joint_center(Joint::Knee, min_visibility)?;
            Some((hip, knee))
        })
        .collect();

    let usable = centers.iter().filter(|c| c.is_some()).count();
    if usable < config.min_samples {
        return Err(AnalysisError::insufficient(
            "weight transfer",
            config.min_samples,
            usable,
        ));
    }

    let mut best: Option<(usize, f32)> = None;
    for i in 1..centers.len() {
        let (Some((hip_a, knee_a)), Some((hip_b, knee_b))) = (centers[i - 1], centers[i]) else {
            continue;
        };
        let shift = (hip_b.x - hip_a.x).abs() + (knee_b.x - knee_a.x).abs();
        if !shift.is_finite() {
            continue;
        }
        match best {
            Some((_, s)) if shift <= s => {}
            _ => best = Some((i, shift)),
        }
    }

    let (frame, shift) = best.ok_or_else(|| {
        AnalysisError::InvalidLandmarks("no consecutive frames with visible hips and knees".to_string())
    })?;

    log::debug!("Weight transfer: peak shift {:.4} at frame {}", shift, frame);

    Ok(MethodResult {
        method: ImpactMethod::WeightTransfer,
        frame,
        confidence: (shift / config.expected_shift.max(f32::EPSILON)).clamp(0.0, 1.0),
        raw_metric: shift,
    })
}
