//! Heuristic phase segmenter
//!
//! # Algorithm
//!
//! Sequential boundary search over one tracked point (default: lead wrist):
//!
//! 1. **Takeaway**: first frame in the early search window whose speed or
//!    displacement from frame 0 exceeds its threshold
//! 2. **Top**: highest point (smallest screen `y`) in `[takeaway, 0.8·N)`;
//!    frames within `top_tie_tolerance` of that height are candidates, and the
//!    stillest candidate after a sustained speed drop wins
//! 3. **Downswing start**: first frame after the top moving down faster than
//!    `downswing_velocity_threshold`
//! 4. **Impact**: peak acceleration and lowest point in `[0.4·N, N)`, whichever
//!    is closer to the window midpoint
//! 5. **Follow-through**: fixed offset after impact
//!
//! Boundaries are then clamped to keep `min_phase_duration` frames between
//! neighbours, kept monotonic, and clipped to the frame range. Phase times are
//! rescaled proportionally onto the real capture duration.
//!
//! Sequences shorter than `min_frames` get proportional fallback boundaries
//! with zero confidence.
//!
//! # Example
//!
//! ```
//! use stratum_swing::config::AnalysisConfig;
//! use stratum_swing::features::phase::{HeuristicSegmenter, PhaseName, PhaseSource};
//! use stratum_swing::pose::synthetic::SyntheticSwing;
//!
//! let frames = SyntheticSwing::default().generate();
//! let timestamps: Vec<f32> = frames.iter().map(|f| f.timestamp_ms).collect();
//! let phases = HeuristicSegmenter.detect_phases(&frames, &timestamps, &AnalysisConfig::default());
//! assert_eq!(phases.len(), 6);
//! assert_eq!(phases[2].name, PhaseName::Top);
//! ```

use std::ops::Range;

use super::metrics::PhaseContext;
use super::{Phase, PhaseName, PhaseSource};
use crate::config::{AnalysisConfig, SegmentationConfig};
use crate::features::kinematics::{
    accelerations, argmax_in, argmin_in, central_speeds, speeds, vertical_velocities,
};
use crate::pose::geometry::Point3;
use crate::pose::landmark::PoseFrame;
use crate::pose::timestamps::capture_duration_ms;
use crate::pose::trajectory::{extract_trajectory, Trajectory};

/// Base confidence per phase, in [`PhaseName::ALL`] order
///
/// Address and impact are the most distinct events; the top and the
/// transition are the hardest to place.
const PHASE_CONFIDENCE: [f32; 6] = [0.9, 0.75, 0.6, 0.65, 0.85, 0.7];

/// Boundary fractions used when the sequence is too short to search
const FALLBACK_FRACTIONS: [f32; 7] = [0.0, 0.15, 0.45, 0.55, 0.72, 0.78, 1.0];

/// Built-in heuristic phase source
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSegmenter;

impl PhaseSource for HeuristicSegmenter {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn detect_phases(
        &self,
        frames: &[PoseFrame],
        timestamps: &[f32],
        config: &AnalysisConfig,
    ) -> Vec<Phase> {
        let trajectory = extract_trajectory(
            frames,
            config.segmentation.tracked_point,
            config.handedness,
            config.min_visibility,
        );
        segment(frames, &trajectory, timestamps, config)
    }
}

/// Interior boundaries found by the search, with fallback markers
#[derive(Debug, Clone, Copy)]
struct Boundaries {
    /// `[0, takeaway, top, downswing, impact, follow_through, N]`
    frames: [usize; 7],
    /// Whether each interior boundary fell back to a default
    fallback: [bool; 5],
}

/// Segment a swing into six phases
///
/// # Arguments
///
/// * `frames` - Pose sequence
/// * `trajectory` - Tracked point, one sample per frame
/// * `timestamps` - One timestamp (ms) per frame
/// * `config` - Analysis configuration
///
/// # Returns
///
/// Exactly six phases tiling `0..frames.len()`; never fails.
pub fn segment(
    frames: &[PoseFrame],
    trajectory: &Trajectory,
    timestamps: &[f32],
    config: &AnalysisConfig,
) -> Vec<Phase> {
    let seg = &config.segmentation;
    let n = frames.len();
    log::debug!("Segmenting {} frames into phases", n);

    let searchable = n >= seg.min_frames && trajectory.len() == n && trajectory.observed_count() > 0;
    let raw = if searchable {
        search_boundaries(trajectory, timestamps, seg)
    } else {
        log::warn!(
            "Phase segmentation: {} frames ({} observed), need {}; using proportional boundaries",
            n,
            trajectory.observed_count(),
            seg.min_frames
        );
        proportional_boundaries(n)
    };

    let bounds = enforce_durations(raw.frames, n, seg.min_phase_duration);
    log::debug!("Phase boundaries: {:?}", bounds);

    let observed_ratio = if trajectory.is_empty() {
        0.0
    } else {
        trajectory.observed_count() as f32 / trajectory.len() as f32
    };

    let start_time = timestamps.first().copied().unwrap_or(0.0);
    let duration = capture_duration_ms(timestamps);
    let boundary_time = |b: usize| {
        if n <= 1 {
            start_time
        } else {
            start_time + duration * b.min(n - 1) as f32 / (n - 1) as f32
        }
    };

    let ctx = PhaseContext::new(frames, trajectory, timestamps, config);

    PhaseName::ALL
        .iter()
        .enumerate()
        .map(|(k, &name)| {
            let start_frame = bounds[k];
            let end_frame = bounds[k + 1];
            let start_time_ms = boundary_time(start_frame);
            let end_time_ms = boundary_time(end_frame);

            let confidence = if searchable {
                let driver = boundary_driver(k);
                let factor = if raw.fallback[driver] { 0.5 } else { 1.0 };
                (PHASE_CONFIDENCE[k] * factor * observed_ratio).clamp(0.0, 1.0)
            } else {
                0.0
            };

            Phase {
                name,
                start_frame,
                end_frame,
                start_time_ms,
                end_time_ms,
                duration_ms: end_time_ms - start_time_ms,
                confidence,
                metrics: ctx.metrics(start_frame, end_frame),
                detail: ctx.detail(name, start_frame, end_frame),
            }
        })
        .collect()
}

/// Interior boundary whose detection decides phase `k`'s confidence
fn boundary_driver(k: usize) -> usize {
    // Address and backswing both hinge on the takeaway; follow-through on impact
    match k {
        0 | 1 => 0,
        2 => 1,
        3 => 2,
        _ => 3,
    }
}

fn proportional_boundaries(n: usize) -> Boundaries {
    let mut frames = [0usize; 7];
    for (slot, fraction) in frames.iter_mut().zip(FALLBACK_FRACTIONS) {
        *slot = (fraction * n as f32).round() as usize;
    }
    frames[6] = n;
    Boundaries {
        frames,
        fallback: [true; 5],
    }
}

fn search_boundaries(
    trajectory: &Trajectory,
    timestamps: &[f32],
    seg: &SegmentationConfig,
) -> Boundaries {
    let n = trajectory.len();
    let points = &trajectory.points;
    let ys = trajectory.ys();
    let speed = speeds(points, timestamps);
    let mut fallback = [false; 5];

    // 1. Takeaway
    let search_end = ((seg.address_search_fraction * n as f32) as usize).max(2).min(n);
    let takeaway = (1..search_end).find(|&i| {
        speed[i] > seg.address_velocity_threshold
            || points[i].distance_2d(points[0]) > seg.address_displacement_threshold
    });
    let takeaway = match takeaway {
        Some(frame) => frame,
        None => {
            fallback[0] = true;
            ((seg.address_fallback_fraction * n as f32).round() as usize).max(1)
        }
    };

    // 2. Top of backswing
    let top_end = ((seg.top_search_end_fraction * n as f32).round() as usize)
        .max(takeaway + 1)
        .min(n);
    let top = match argmin_in(&ys, takeaway..top_end) {
        Some(highest) => refine_top(highest, takeaway..top_end, &ys, &speed, points, timestamps, seg),
        None => {
            fallback[1] = true;
            n / 2
        }
    };

    // 3. Downswing start
    let vertical = vertical_velocities(points, timestamps);
    let downswing = match (top + 1..n).find(|&i| vertical[i] > seg.downswing_velocity_threshold) {
        Some(frame) => frame,
        None => {
            fallback[2] = true;
            top + seg.downswing_fallback_offset
        }
    };

    // 4. Impact
    let window_start = ((seg.impact_search_start_fraction * n as f32).round() as usize)
        .max(downswing + seg.min_phase_duration);
    let impact = if window_start < n {
        let acc = accelerations(points, timestamps);
        let midpoint = (window_start + n - 1) as f32 / 2.0;
        match (argmax_in(&acc, window_start..n), argmax_in(&ys, window_start..n)) {
            (Some(a), Some(l)) => {
                let da = (a as f32 - midpoint).abs();
                let dl = (l as f32 - midpoint).abs();
                log::trace!("Impact candidates: acceleration {}, lowest {}", a, l);
                if dl < da {
                    l
                } else {
                    a
                }
            }
            (Some(a), None) => a,
            (None, Some(l)) => l,
            (None, None) => {
                fallback[3] = true;
                ((0.72 * n as f32).round() as usize).max(downswing + 1)
            }
        }
    } else {
        fallback[3] = true;
        ((0.72 * n as f32).round() as usize).max(downswing + 1)
    };

    // 5. Follow-through
    let follow_through = impact + seg.follow_through_offset;

    log::debug!(
        "Raw boundaries: takeaway {}, top {}, downswing {}, impact {}, follow-through {}",
        takeaway,
        top,
        downswing,
        impact,
        follow_through
    );
    if fallback.iter().any(|&f| f) {
        log::warn!("Phase segmentation used fallback boundaries: {:?}", fallback);
    }

    Boundaries {
        frames: [0, takeaway, top, downswing, impact, follow_through, n],
        fallback,
    }
}

/// Pick the physically meaningful top among near-highest frames
///
/// Candidates lie within `top_tie_tolerance` of the highest point. A candidate
/// qualifies when its speed and the next frame's speed have both dropped by at
/// least `velocity_drop_ratio` from the backswing peak; the qualifying
/// candidate with the lowest central speed wins.
fn refine_top(
    highest: usize,
    window: Range<usize>,
    ys: &[f32],
    speed: &[f32],
    points: &[Point3],
    timestamps: &[f32],
    seg: &SegmentationConfig,
) -> usize {
    let peak_speed = speed[window.start..=highest]
        .iter()
        .copied()
        .fold(0.0f32, f32::max);
    if peak_speed <= 0.0 {
        return highest;
    }
    let limit = (1.0 - seg.velocity_drop_ratio) * peak_speed;
    let central = central_speeds(points, timestamps);

    let best = window
        .filter(|&c| ys[c] <= ys[highest] + seg.top_tie_tolerance)
        .filter(|&c| speed[c] <= limit && speed.get(c + 1).map_or(true, |&s| s <= limit))
        .min_by(|&a, &b| central[a].total_cmp(&central[b]));

    match best {
        Some(frame) => {
            if frame != highest {
                log::trace!("Top refined from {} to {}", highest, frame);
            }
            frame
        }
        None => highest,
    }
}

/// Enforce minimum phase lengths, monotonic order and the frame range
fn enforce_durations(raw: [usize; 7], n: usize, min_phase_duration: usize) -> [usize; 7] {
    let min_len = min_phase_duration.min(n / 6);
    let mut bounds = raw;
    bounds[0] = 0;
    bounds[6] = n;
    for k in 1..6 {
        let lower = bounds[k - 1] + min_len;
        let upper = n - min_len * (6 - k);
        bounds[k] = bounds[k].clamp(lower, upper);
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Handedness;
    use crate::pose::landmark::index;
    use crate::pose::synthetic::SyntheticSwing;

    fn run(swing: &SyntheticSwing) -> Vec<Phase> {
        let frames = swing.generate();
        let stamps: Vec<f32> = frames.iter().map(|f| f.timestamp_ms).collect();
        HeuristicSegmenter.detect_phases(&frames, &stamps, &AnalysisConfig::default())
    }

    fn assert_tiles(phases: &[Phase], n: usize) {
        assert_eq!(phases.len(), 6);
        assert_eq!(phases[0].start_frame, 0);
        assert_eq!(phases[5].end_frame, n);
        for (k, pair) in phases.windows(2).enumerate() {
            assert_eq!(pair[0].end_frame, pair[1].start_frame, "gap after phase {}", k);
        }
        for (phase, name) in phases.iter().zip(PhaseName::ALL) {
            assert_eq!(phase.name, name);
        }
    }

    #[test]
    fn test_synthetic_boundaries() {
        let swing = SyntheticSwing::default();
        let phases = run(&swing);
        assert_tiles(&phases, 150);

        let keys = swing.key_frames();
        let top = phases[2].start_frame;
        let impact = phases[4].start_frame;
        assert!(top.abs_diff(keys.top) <= 5, "top {}", top);
        assert!((105..=112).contains(&impact), "impact {}", impact);
        assert!(phases[1].start_frame > keys.takeaway);
        assert_eq!(phases[5].start_frame, impact + 3);
    }

    #[test]
    fn test_durations_sum_to_capture() {
        let phases = run(&SyntheticSwing::default());
        let total: f32 = phases.iter().map(|p| p.duration_ms).sum();
        let capture = 149.0 * 1000.0 / 30.0;
        assert!((total - capture).abs() < 1e-2);
        assert!(phases.iter().all(|p| p.duration_ms > 0.0));
    }

    #[test]
    fn test_confidence_reflects_phase_difficulty() {
        let phases = run(&SyntheticSwing::default());
        assert!(phases[0].confidence > phases[2].confidence);
        assert!(phases[4].confidence > phases[3].confidence);
        assert!(phases.iter().all(|p| (0.0..=1.0).contains(&p.confidence)));
    }

    #[test]
    fn test_short_sequence_falls_back() {
        let phases = run(&SyntheticSwing::with_frames(3));
        assert_tiles(&phases, 3);
        assert!(phases.iter().all(|p| p.confidence == 0.0));
    }

    #[test]
    fn test_minimum_length_is_enforced() {
        for n in [10usize, 12, 20, 31] {
            let phases = run(&SyntheticSwing::with_frames(n));
            assert_tiles(&phases, n);
            let min_len = 2usize.min(n / 6);
            assert!(phases.iter().all(|p| p.frame_count() >= min_len), "n = {}", n);
        }
    }

    #[test]
    fn test_still_sequence_uses_fallbacks() {
        // Wrist hidden everywhere: nothing to track
        let phases = run(&SyntheticSwing::default().occlude(index::LEFT_WRIST, 0..150));
        assert_tiles(&phases, 150);
        assert!(phases.iter().all(|p| p.confidence == 0.0));
    }

    #[test]
    fn test_enforce_durations_clamps() {
        let bounds = enforce_durations([0, 0, 0, 5, 5, 99, 20], 20, 2);
        assert_eq!(bounds, [0, 2, 4, 6, 8, 18, 20]);
    }

    #[test]
    fn test_left_handed_matches_right_handed() {
        let right = run(&SyntheticSwing::default());
        let config = AnalysisConfig {
            handedness: Handedness::Left,
            ..AnalysisConfig::default()
        };
        let frames = SyntheticSwing::default()
            .handedness(Handedness::Left)
            .generate();
        let stamps: Vec<f32> = frames.iter().map(|f| f.timestamp_ms).collect();
        let left = HeuristicSegmenter.detect_phases(&frames, &stamps, &config);
        for (r, l) in right.iter().zip(&left) {
            assert_eq!(r.start_frame, l.start_frame);
        }
    }
}
