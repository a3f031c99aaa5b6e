//! Finite-difference kinematics and series helpers
//!
//! All derivatives are taken in the image plane (x, y) and scaled by the real
//! inter-frame time, so thresholds are expressed in normalized units per
//! second regardless of capture rate.

use std::ops::Range;

use crate::pose::geometry::Point3;
use crate::pose::timestamps::delta_seconds;

/// Backward-difference speed per frame (`speeds[0] == 0`)
pub fn speeds(points: &[Point3], timestamps: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0; points.len()];
    for i in 1..points.len() {
        out[i] = points[i].distance_2d(points[i - 1]) / delta_seconds(timestamps, i - 1, i);
    }
    out
}

/// Backward-difference vertical velocity per frame (positive = moving down)
pub fn vertical_velocities(points: &[Point3], timestamps: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0; points.len()];
    for i in 1..points.len() {
        out[i] = (points[i].y - points[i - 1].y) / delta_seconds(timestamps, i - 1, i);
    }
    out
}

/// Central-difference speed at every frame (one-sided at the ends)
pub fn central_speeds(points: &[Point3], timestamps: &[f32]) -> Vec<f32> {
    let n = points.len();
    if n < 2 {
        return vec![0.0; n];
    }
    (0..n)
        .map(|i| {
            let (a, b) = if i == 0 {
                (0, 1)
            } else if i == n - 1 {
                (n - 2, n - 1)
            } else {
                (i - 1, i + 1)
            };
            points[b].distance_2d(points[a]) / delta_seconds(timestamps, a, b)
        })
        .collect()
}

/// Magnitude of the second difference (acceleration) at every frame
///
/// Uses `p[i+1] - 2p[i] + p[i-1]` over the mean of the two adjacent intervals
/// squared. The first and last frames are 0.
pub fn accelerations(points: &[Point3], timestamps: &[f32]) -> Vec<f32> {
    let n = points.len();
    let mut out = vec![0.0; n];
    if n < 3 {
        return out;
    }
    for i in 1..n - 1 {
        let ax = points[i + 1].x - 2.0 * points[i].x + points[i - 1].x;
        let ay = points[i + 1].y - 2.0 * points[i].y + points[i - 1].y;
        let dt = 0.5 * (delta_seconds(timestamps, i - 1, i) + delta_seconds(timestamps, i, i + 1));
        out[i] = (ax * ax + ay * ay).sqrt() / (dt * dt);
    }
    out
}

/// Index of the first maximum of `values` within `range`
pub fn argmax_in(values: &[f32], range: Range<usize>) -> Option<usize> {
    let end = range.end.min(values.len());
    let mut best: Option<usize> = None;
    for i in range.start..end {
        if !values[i].is_finite() {
            continue;
        }
        match best {
            Some(b) if values[i] <= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Index of the first minimum of `values` within `range`
pub fn argmin_in(values: &[f32], range: Range<usize>) -> Option<usize> {
    let end = range.end.min(values.len());
    let mut best: Option<usize> = None;
    for i in range.start..end {
        if !values[i].is_finite() {
            continue;
        }
        match best {
            Some(b) if values[i] >= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Arithmetic mean (0 for an empty slice)
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}

/// Population variance (0 for an empty slice)
pub fn variance(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f32>() / values.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, step: f32) -> Vec<Point3> {
        (0..n).map(|i| Point3::new(i as f32 * step, 0.0, 0.0)).collect()
    }

    fn stamps(n: usize, interval_ms: f32) -> Vec<f32> {
        (0..n).map(|i| i as f32 * interval_ms).collect()
    }

    #[test]
    fn test_constant_velocity() {
        let pts = line(5, 0.01);
        let ts = stamps(5, 100.0);
        let v = speeds(&pts, &ts);
        assert_eq!(v[0], 0.0);
        assert!((v[3] - 0.1).abs() < 1e-4);
        let c = central_speeds(&pts, &ts);
        assert!((c[0] - 0.1).abs() < 1e-4);
        assert!((c[2] - 0.1).abs() < 1e-4);
        let a = accelerations(&pts, &ts);
        assert!(a.iter().all(|&x| x.abs() < 1e-3));
    }

    #[test]
    fn test_acceleration_peak_at_kink() {
        let mut pts = line(6, 0.01);
        for (i, p) in pts.iter_mut().enumerate().skip(3) {
            p.x = 0.03 - (i as f32 - 3.0) * 0.01;
        }
        let ts = stamps(6, 100.0);
        let a = accelerations(&pts, &ts);
        assert_eq!(argmax_in(&a, 0..6), Some(3));
    }

    #[test]
    fn test_vertical_velocity_sign() {
        let pts = vec![Point3::new(0.0, 0.5, 0.0), Point3::new(0.0, 0.6, 0.0)];
        let v = vertical_velocities(&pts, &[0.0, 100.0]);
        assert!(v[1] > 0.0);
    }

    #[test]
    fn test_argmax_argmin_first_and_bounded() {
        let values = [1.0, 3.0, 3.0, 0.5, f32::NAN];
        assert_eq!(argmax_in(&values, 0..5), Some(1));
        assert_eq!(argmin_in(&values, 0..5), Some(3));
        assert_eq!(argmax_in(&values, 2..100), Some(2));
        assert_eq!(argmax_in(&values, 4..5), None);
        assert_eq!(argmax_in(&values, 3..3), None);
    }

    #[test]
    fn test_mean_variance() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 3.0]) - 2.0).abs() < 1e-6);
        assert!((variance(&[1.0, 3.0]) - 1.0).abs() < 1e-6);
    }
}
