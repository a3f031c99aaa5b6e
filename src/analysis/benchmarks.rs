//! Benchmark corridors
//!
//! Static `{min, ideal, max}` reference bands for every scored metric at every
//! skill tier, plus the physically possible range of each metric.
//!
//! # Scoring
//!
//! - At `ideal`: 100
//! - Inside the band: `100 - 40 · d / side_width`, where `d` is the distance
//!   from `ideal` and `side_width` the distance from `ideal` to the edge on the
//!   same side (60 at `min` or `max`)
//! - Outside the band: a linear falloff from 60 to 0 over
//!   `tolerance · side_width` of the exceeded side. Every tier tolerance is
//!   below 1.5, so the falloff is always steeper than the in-band slope
//!
//! # Example
//!
//! ```
//! use stratum_swing::analysis::benchmarks::{corridor, MetricKind, SkillLevel};
//!
//! let tempo = corridor(MetricKind::TempoRatio, SkillLevel::Intermediate);
//! assert_eq!(tempo.score(3.0), 100.0);
//! assert!(tempo.score(2.7) > tempo.score(2.5));
//! ```

use serde::{Deserialize, Serialize};

/// Numerical stability epsilon
const EPSILON: f32 = 1e-6;

/// Score at the edge of a corridor
const EDGE_SCORE: f32 = 60.0;

/// Skill tier selecting the benchmark corridors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillLevel {
    /// New golfers; widest corridors
    Beginner,
    /// Club golfers
    Intermediate,
    /// Low handicappers
    Advanced,
    /// Tour professionals; tightest corridors
    Professional,
}

impl SkillLevel {
    /// All tiers, loosest first
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Professional,
    ];

    /// Human-readable tier name
    pub fn name(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Professional => "professional",
        }
    }

    /// Out-of-band falloff span as a multiple of the exceeded side's width
    pub fn tolerance(&self) -> f32 {
        match self {
            SkillLevel::Beginner => 1.0,
            SkillLevel::Intermediate => 0.75,
            SkillLevel::Advanced => 0.5,
            SkillLevel::Professional => 0.35,
        }
    }
}

/// Every scored raw metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Backswing duration / downswing duration
    TempoRatio,
    /// Shoulder turn at the top (degrees)
    ShoulderRotation,
    /// Hip turn at the top (degrees)
    HipRotation,
    /// Shoulder turn minus hip turn at the top (degrees)
    XFactor,
    /// Delay from peak hip speed to peak shoulder speed in the downswing (ms)
    SequenceGap,
    /// Lead-side weight at address (percent)
    AddressWeight,
    /// Lead-side weight at the top (percent)
    TopWeight,
    /// Lead-side weight at impact (percent)
    ImpactWeight,
    /// Mean shaft inclination during the backswing (degrees)
    PlaneAngle,
    /// Mean frame-to-frame change of the shaft inclination (degrees)
    PlaneDeviation,
    /// Lateral spine tilt at address (degrees)
    SpineTilt,
    /// Largest lateral head movement before impact (shoulder widths)
    HeadDisplacement,
    /// Lead knee flex at address (degrees)
    KneeFlex,
}

impl MetricKind {
    /// Human-readable metric name
    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::TempoRatio => "tempo ratio",
            MetricKind::ShoulderRotation => "shoulder turn",
            MetricKind::HipRotation => "hip turn",
            MetricKind::XFactor => "X-factor",
            MetricKind::SequenceGap => "kinematic sequence",
            MetricKind::AddressWeight => "weight at address",
            MetricKind::TopWeight => "weight at the top",
            MetricKind::ImpactWeight => "weight at impact",
            MetricKind::PlaneAngle => "swing plane angle",
            MetricKind::PlaneDeviation => "swing plane consistency",
            MetricKind::SpineTilt => "spine tilt",
            MetricKind::HeadDisplacement => "head movement",
            MetricKind::KneeFlex => "knee flex",
        }
    }

    /// Physically possible range of the raw value
    pub fn physical_bounds(&self) -> PhysicalBounds {
        let (min, max, hard) = match self {
            // A tempo outside [1, 5] is implausible but can still be measured
            MetricKind::TempoRatio => (1.0, 5.0, false),
            MetricKind::ShoulderRotation | MetricKind::HipRotation | MetricKind::XFactor => {
                (0.0, 180.0, true)
            }
            MetricKind::SequenceGap => (-1000.0, 1000.0, false),
            MetricKind::AddressWeight | MetricKind::TopWeight | MetricKind::ImpactWeight => {
                (0.0, 100.0, true)
            }
            MetricKind::PlaneAngle | MetricKind::PlaneDeviation | MetricKind::SpineTilt => {
                (0.0, 90.0, true)
            }
            MetricKind::HeadDisplacement => (0.0, 5.0, false),
            MetricKind::KneeFlex => (0.0, 180.0, true),
        };
        PhysicalBounds { min, max, hard }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Physically possible range of a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalBounds {
    /// Lowest possible value
    pub min: f32,
    /// Highest possible value
    pub max: f32,
    /// Whether a violation makes the result unusable (error) or only suspect (warning)
    pub hard: bool,
}

impl PhysicalBounds {
    /// Whether `value` lies inside the bounds
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Reference band for one metric at one skill tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkCorridor {
    /// Lower edge of the band
    pub min: f32,
    /// Ideal value
    pub ideal: f32,
    /// Upper edge of the band
    pub max: f32,
    /// Out-of-band falloff span as a multiple of the exceeded side's width
    pub tolerance: f32,
}

impl BenchmarkCorridor {
    /// Score `value` in [0, 100]
    ///
    /// Non-finite values score 0.
    pub fn score(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return 0.0;
        }
        let below = self.ideal - self.min;
        let above = self.max - self.ideal;

        let (distance, side_width, edge) = if value < self.ideal {
            (self.ideal - value, below, self.min)
        } else {
            (value - self.ideal, above, self.max)
        };

        if distance <= side_width {
            if side_width < EPSILON {
                return 100.0;
            }
            return (100.0 - (100.0 - EDGE_SCORE) * distance / side_width).clamp(0.0, 100.0);
        }

        let overshoot = (value - edge).abs();
        let span = self.tolerance * side_width.max(EPSILON);
        if span < EPSILON {
            return 0.0;
        }
        (EDGE_SCORE * (1.0 - overshoot / span)).clamp(0.0, 100.0)
    }

    /// Whether `value` lies inside the band
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// `(min, ideal, max)` per metric, per tier (Beginner, Intermediate, Advanced, Professional)
const CORRIDORS: [[(f32, f32, f32); 4]; 13] = [
    // TempoRatio
    [(2.0, 3.0, 4.5), (2.3, 3.0, 4.0), (2.6, 3.0, 3.5), (2.8, 3.0, 3.3)],
    // ShoulderRotation
    [(60.0, 85.0, 110.0), (70.0, 90.0, 110.0), (80.0, 90.0, 105.0), (85.0, 95.0, 105.0)],
    // HipRotation
    [(25.0, 45.0, 65.0), (30.0, 45.0, 60.0), (35.0, 45.0, 55.0), (38.0, 45.0, 52.0)],
    // XFactor
    [(20.0, 40.0, 60.0), (25.0, 45.0, 60.0), (35.0, 45.0, 58.0), (40.0, 50.0, 58.0)],
    // SequenceGap
    [(0.0, 40.0, 150.0), (10.0, 40.0, 120.0), (15.0, 40.0, 90.0), (20.0, 40.0, 70.0)],
    // AddressWeight
    [(40.0, 50.0, 60.0), (42.0, 50.0, 58.0), (45.0, 50.0, 55.0), (47.0, 50.0, 53.0)],
    // TopWeight
    [(20.0, 35.0, 55.0), (20.0, 35.0, 50.0), (25.0, 35.0, 45.0), (28.0, 35.0, 42.0)],
    // ImpactWeight
    [(55.0, 80.0, 95.0), (60.0, 80.0, 95.0), (65.0, 80.0, 92.0), (70.0, 82.0, 92.0)],
    // PlaneAngle
    [(30.0, 55.0, 80.0), (35.0, 55.0, 75.0), (40.0, 55.0, 70.0), (45.0, 55.0, 65.0)],
    // PlaneDeviation
    [(0.0, 0.0, 15.0), (0.0, 0.0, 12.0), (0.0, 0.0, 9.0), (0.0, 0.0, 6.0)],
    // SpineTilt
    [(0.0, 5.0, 25.0), (0.0, 5.0, 20.0), (0.0, 5.0, 15.0), (0.0, 5.0, 12.0)],
    // HeadDisplacement
    [(0.0, 0.0, 0.6), (0.0, 0.0, 0.45), (0.0, 0.0, 0.35), (0.0, 0.0, 0.25)],
    // KneeFlex
    [(5.0, 25.0, 45.0), (10.0, 25.0, 40.0), (15.0, 25.0, 35.0), (18.0, 25.0, 32.0)],
];

/// Corridor for `kind` at `level`
pub fn corridor(kind: MetricKind, level: SkillLevel) -> BenchmarkCorridor {
    let (min, ideal, max) = CORRIDORS[kind.index()][level as usize];
    BenchmarkCorridor {
        min,
        ideal,
        max,
        tolerance: level.tolerance(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [MetricKind; 13] = [
        MetricKind::TempoRatio,
        MetricKind::ShoulderRotation,
        MetricKind::HipRotation,
        MetricKind::XFactor,
        MetricKind::SequenceGap,
        MetricKind::AddressWeight,
        MetricKind::TopWeight,
        MetricKind::ImpactWeight,
        MetricKind::PlaneAngle,
        MetricKind::PlaneDeviation,
        MetricKind::SpineTilt,
        MetricKind::HeadDisplacement,
        MetricKind::KneeFlex,
    ];

    #[test]
    fn test_ideal_scores_100_everywhere() {
        for kind in ALL_KINDS {
            for level in SkillLevel::ALL {
                let c = corridor(kind, level);
                assert!(c.min <= c.ideal && c.ideal <= c.max, "{:?} {:?}", kind, level);
                assert_eq!(c.score(c.ideal), 100.0, "{:?} {:?}", kind, level);
            }
        }
    }

    #[test]
    fn test_strictly_decreasing_away_from_ideal() {
        for kind in ALL_KINDS {
            let c = corridor(kind, SkillLevel::Intermediate);
            let mut previous = c.score(c.ideal);
            for step in 1..=10 {
                let v = c.ideal + (c.max - c.ideal) * step as f32 / 10.0;
                let s = c.score(v);
                assert!(s < previous, "{:?} above ideal at {}", kind, v);
                previous = s;
            }
            if c.ideal > c.min {
                let mut previous = c.score(c.ideal);
                for step in 1..=10 {
                    let v = c.ideal - (c.ideal - c.min) * step as f32 / 10.0;
                    let s = c.score(v);
                    assert!(s < previous, "{:?} below ideal at {}", kind, v);
                    previous = s;
                }
            }
        }
    }

    #[test]
    fn test_edges_and_falloff() {
        let c = corridor(MetricKind::TempoRatio, SkillLevel::Intermediate);
        assert!((c.score(c.min) - 60.0).abs() < 1e-3);
        assert!((c.score(c.max) - 60.0).abs() < 1e-3);
        assert!(c.score(c.max + 0.1) < 60.0);
        assert_eq!(c.score(10.0), 0.0);
        assert_eq!(c.score(f32::NAN), 0.0);
    }

    #[test]
    fn test_falloff_steeper_outside_band() {
        for kind in ALL_KINDS {
            for level in SkillLevel::ALL {
                let c = corridor(kind, level);
                let sides = [(c.min, c.ideal - c.min, -1.0), (c.max, c.max - c.ideal, 1.0)];
                for (edge, width, dir) in sides {
                    if width < 1e-3 {
                        continue;
                    }
                    let inside = (c.score(c.ideal) - c.score(edge)) / width;
                    let step = 0.1 * c.tolerance * width;
                    let outside = (c.score(edge) - c.score(edge + dir * step)) / step;
                    assert!(
                        outside > inside,
                        "{:?} {:?}: inside {} outside {}",
                        kind,
                        level,
                        inside,
                        outside
                    );
                }
            }
        }
    }

    #[test]
    fn test_narrow_side_falloff_uses_own_width() {
        // Sequence gap band 10..40..120: the lower side is the narrow one
        let c = corridor(MetricKind::SequenceGap, SkillLevel::Intermediate);
        let span = c.tolerance * (c.ideal - c.min);
        assert!((c.score(c.min - span / 2.0) - 30.0).abs() < 1e-3);
        assert_eq!(c.score(c.min - span), 0.0);
        assert_eq!(c.score(-50.0), 0.0);
    }

    #[test]
    fn test_tighter_tiers_punish_more() {
        let beginner = corridor(MetricKind::HipRotation, SkillLevel::Beginner);
        let pro = corridor(MetricKind::HipRotation, SkillLevel::Professional);
        assert!(pro.score(55.0) < beginner.score(55.0));
        assert!(SkillLevel::Professional.tolerance() < SkillLevel::Beginner.tolerance());
    }

    #[test]
    fn test_physical_bounds() {
        assert!(!MetricKind::TempoRatio.physical_bounds().hard);
        assert!(MetricKind::ShoulderRotation.physical_bounds().hard);
        assert!(MetricKind::ImpactWeight.physical_bounds().contains(71.0));
        assert!(!MetricKind::ImpactWeight.physical_bounds().contains(120.0));
    }
}
