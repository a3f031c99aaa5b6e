//! Resolution recalibration of club-head paths
//!
//! Landmarks are normalized per axis to the capture frame. When the capture
//! resolution differs from the reference, each axis is rescaled by its pixel
//! ratio so the path is expressed in reference-frame units: one unit of `x`
//! is one reference width and one unit of `y` one reference height.

use super::ClubPathPoint;
use crate::config::Resolution;

/// Per-axis `(x, y)` scale that maps `capture` coordinates into `reference` units
///
/// Returns `None` when the resolutions are identical or either is degenerate.
pub fn resolution_scale(capture: Resolution, reference: Resolution) -> Option<(f32, f32)> {
    if capture == reference || capture.is_degenerate() || reference.is_degenerate() {
        return None;
    }
    Some((
        capture.width as f32 / reference.width as f32,
        capture.height as f32 / reference.height as f32,
    ))
}

/// Rescale a path in place; returns whether calibration was applied
pub fn calibrate(points: &mut [ClubPathPoint], capture: Resolution, reference: Resolution) -> bool {
    let Some((scale_x, scale_y)) = resolution_scale(capture, reference) else {
        return false;
    };

    log::debug!(
        "Recalibrating club path: {}x{} → {}x{} (scale {:.4} x {:.4})",
        capture.width,
        capture.height,
        reference.width,
        reference.height,
        scale_x,
        scale_y
    );

    for point in points.iter_mut() {
        point.x *= scale_x;
        point.y *= scale_y;
    }
    true
}
