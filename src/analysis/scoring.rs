//! Metrics scorer
//!
//! Computes raw biomechanical quantities from the phases, pose frames and club
//! path, scores each against the skill tier's benchmark corridors, and rolls
//! the five category scores into an overall score and letter grade.
//!
//! # Categories
//!
//! | Category | Raw metrics |
//! |---|---|
//! | Tempo | backswing / downswing duration |
//! | Rotation | shoulder turn, hip turn, X-factor, hip→shoulder sequencing gap |
//! | Weight transfer | lead-side weight at address, top, impact |
//! | Swing plane | mean shaft inclination during the backswing, its frame-to-frame change |
//! | Body alignment | spine tilt, head movement, knee flex |
//!
//! A category score is the mean of its measured metric scores; a category with
//! no measurable metric scores 0. The overall score is the unweighted mean of
//! the five categories.

use serde::{Deserialize, Serialize};

use super::benchmarks::{corridor, MetricKind, SkillLevel};
use crate::config::{AnalysisConfig, ClubType};
use crate::features::body::{measure_all, reference_headings, rotation_deg, rotation_speeds, BodyMeasures};
use crate::features::club_path::ClubPath;
use crate::features::kinematics::{argmax_in, mean};
use crate::features::phase::{find_phase, Phase, PhaseName};
use crate::pose::geometry::inclination_deg;
use crate::pose::landmark::{Joint, PoseFrame};

/// Categories below this score are listed as key improvements
const IMPROVEMENT_THRESHOLD: f32 = 70.0;

/// Number of raw metrics across all categories
const METRIC_COUNT: usize = 13;

/// Letter grade for the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LetterGrade {
    /// 90 and above
    A,
    /// 80 to 90
    B,
    /// 70 to 80
    C,
    /// 60 to 70
    D,
    /// Below 60
    F,
}

impl LetterGrade {
    /// Grade for an overall score
    pub fn from_score(score: f32) -> Self {
        if score >= 90.0 {
            LetterGrade::A
        } else if score >= 80.0 {
            LetterGrade::B
        } else if score >= 70.0 {
            LetterGrade::C
        } else if score >= 60.0 {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }

    /// Grade letter
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

/// Tempo category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TempoMetrics {
    /// Backswing duration / downswing duration
    pub ratio: Option<f32>,
    /// Backswing phase duration (ms)
    pub backswing_ms: f32,
    /// Downswing phase duration (ms)
    pub downswing_ms: f32,
    /// Category score (0-100)
    pub score: f32,
}

/// Rotation category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationMetrics {
    /// Shoulder turn at the top (degrees)
    pub shoulder_turn_deg: Option<f32>,
    /// Hip turn at the top (degrees)
    pub hip_turn_deg: Option<f32>,
    /// Shoulder turn minus hip turn at the top (degrees)
    pub x_factor_deg: Option<f32>,
    /// Time from peak hip rotation speed to peak shoulder rotation speed (ms)
    pub sequence_gap_ms: Option<f32>,
    /// Category score (0-100)
    pub score: f32,
}

/// Weight-transfer category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightTransferMetrics {
    /// Lead-side weight at address (percent)
    pub address_lead_pct: Option<f32>,
    /// Lead-side weight at the top (percent)
    pub top_lead_pct: Option<f32>,
    /// Lead-side weight at impact (percent)
    pub impact_lead_pct: Option<f32>,
    /// Category score (0-100)
    pub score: f32,
}

/// Swing-plane category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwingPlaneMetrics {
    /// Mean grip→club-head inclination during the backswing (degrees)
    pub plane_angle_deg: Option<f32>,
    /// Mean absolute frame-to-frame change of that inclination (degrees)
    pub plane_deviation_deg: Option<f32>,
    /// Category score (0-100)
    pub score: f32,
}

/// Body-alignment category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyAlignmentMetrics {
    /// Lateral spine tilt at address (degrees)
    pub spine_tilt_deg: Option<f32>,
    /// Largest lateral head movement before impact, in shoulder widths
    pub head_displacement: Option<f32>,
    /// Lead knee flex at address (degrees)
    pub knee_flex_deg: Option<f32>,
    /// Category score (0-100)
    pub score: f32,
}

/// Scored swing metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingMetrics {
    /// Tempo category
    pub tempo: TempoMetrics,
    /// Rotation category
    pub rotation: RotationMetrics,
    /// Weight-transfer category
    pub weight_transfer: WeightTransferMetrics,
    /// Swing-plane category
    pub swing_plane: SwingPlaneMetrics,
    /// Body-alignment category
    pub body_alignment: BodyAlignmentMetrics,
    /// Unweighted mean of the five category scores (0-100)
    pub overall_score: f32,
    /// Letter grade of the overall score
    pub letter_grade: LetterGrade,
    /// One feedback line per category
    pub feedback: Vec<String>,
    /// Categories scoring below 70, weakest first
    pub key_improvements: Vec<String>,
    /// Metric coverage times mean phase confidence (0.0-1.0)
    pub confidence: f32,
}

impl SwingMetrics {
    /// Category scores in display order
    pub fn category_scores(&self) -> [(&'static str, f32); 5] {
        [
            ("tempo", self.tempo.score),
            ("rotation", self.rotation.score),
            ("weight transfer", self.weight_transfer.score),
            ("swing plane", self.swing_plane.score),
            ("body alignment", self.body_alignment.score),
        ]
    }

    /// Every measured raw value with its metric kind
    pub fn raw_values(&self) -> Vec<(MetricKind, f32)> {
        [
            (MetricKind::TempoRatio, self.tempo.ratio),
            (MetricKind::ShoulderRotation, self.rotation.shoulder_turn_deg),
            (MetricKind::HipRotation, self.rotation.hip_turn_deg),
            (MetricKind::XFactor, self.rotation.x_factor_deg),
            (MetricKind::SequenceGap, self.rotation.sequence_gap_ms),
            (MetricKind::AddressWeight, self.weight_transfer.address_lead_pct),
            (MetricKind::TopWeight, self.weight_transfer.top_lead_pct),
            (MetricKind::ImpactWeight, self.weight_transfer.impact_lead_pct),
            (MetricKind::PlaneAngle, self.swing_plane.plane_angle_deg),
            (MetricKind::PlaneDeviation, self.swing_plane.plane_deviation_deg),
            (MetricKind::SpineTilt, self.body_alignment.spine_tilt_deg),
            (MetricKind::HeadDisplacement, self.body_alignment.head_displacement),
            (MetricKind::KneeFlex, self.body_alignment.knee_flex_deg),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.map(|v| (kind, v)))
        .collect()
    }

    /// Metric kinds that could not be measured
    pub fn missing_metrics(&self) -> Vec<MetricKind> {
        let present: Vec<MetricKind> = self.raw_values().into_iter().map(|(k, _)| k).collect();
        ALL_METRICS
            .iter()
            .copied()
            .filter(|k| !present.contains(k))
            .collect()
    }
}

const ALL_METRICS: [MetricKind; METRIC_COUNT] = [
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

/// Score a swing against the configured skill tier
///
/// # Arguments
///
/// * `phases` - The six ordered phases
/// * `frames` - Pose frames the phases index into
/// * `club_path` - Estimated club-head path
/// * `timestamps` - Resolved timestamps (ms), one per frame
/// * `config` - Analysis configuration (skill level, club type, handedness)
///
/// # Returns
///
/// Scored metrics. Metrics whose landmarks or phases are unavailable are
/// `None`; categories without any measured metric score 0.
pub fn score(
    phases: &[Phase],
    frames: &[PoseFrame],
    club_path: &ClubPath,
    timestamps: &[f32],
    config: &AnalysisConfig,
) -> SwingMetrics {
    log::debug!(
        "Scoring swing: {} phases, {} frames, {} path points, tier {}",
        phases.len(),
        frames.len(),
        club_path.len(),
        config.skill_level.name()
    );

    let level = config.skill_level;
    let measures = measure_all(frames, config.handedness, config.min_visibility);
    let start_of = |name: PhaseName| find_phase(phases, name).map(|p| p.start_frame);
    let at = |frame: Option<usize>| frame.and_then(|f| measures.get(f));

    let tempo = tempo_metrics(phases, level);
    let rotation = rotation_metrics(phases, &measures, timestamps, level);

    let weight_transfer = {
        let address_lead_pct = at(start_of(PhaseName::Address)).and_then(|m| m.lead_weight_pct);
        let top_lead_pct = at(start_of(PhaseName::Top)).and_then(|m| m.lead_weight_pct);
        let impact_lead_pct = at(start_of(PhaseName::Impact)).and_then(|m| m.lead_weight_pct);
        WeightTransferMetrics {
            address_lead_pct,
            top_lead_pct,
            impact_lead_pct,
            score: category_score(
                &[
                    (MetricKind::AddressWeight, address_lead_pct),
                    (MetricKind::TopWeight, top_lead_pct),
                    (MetricKind::ImpactWeight, impact_lead_pct),
                ],
                level,
            ),
        }
    };

    let swing_plane = swing_plane_metrics(phases, frames, club_path, config);

    let body_alignment = {
        let address = at(start_of(PhaseName::Address));
        let spine_tilt_deg = address.and_then(|m| m.spine_tilt_deg);
        let knee_flex_deg = address.and_then(|m| m.knee_flex_deg);
        let impact_end = find_phase(phases, PhaseName::Impact).map(|p| p.start_frame + 1);
        let head_displacement = address.zip(impact_end).and_then(|(m, end)| {
            head_displacement(m, &measures[..end.min(measures.len())])
        });
        BodyAlignmentMetrics {
            spine_tilt_deg,
            head_displacement,
            knee_flex_deg,
            score: category_score(
                &[
                    (MetricKind::SpineTilt, spine_tilt_deg),
                    (MetricKind::HeadDisplacement, head_displacement),
                    (MetricKind::KneeFlex, knee_flex_deg),
                ],
                level,
            ),
        }
    };

    let mut metrics = SwingMetrics {
        tempo,
        rotation,
        weight_transfer,
        swing_plane,
        body_alignment,
        overall_score: 0.0,
        letter_grade: LetterGrade::F,
        feedback: Vec::new(),
        key_improvements: Vec::new(),
        confidence: 0.0,
    };

    let categories = metrics.category_scores();
    metrics.overall_score =
        categories.iter().map(|(_, s)| s).sum::<f32>() / categories.len() as f32;
    metrics.letter_grade = LetterGrade::from_score(metrics.overall_score);

    let coverage = metrics.raw_values().len() as f32 / METRIC_COUNT as f32;
    let phase_confidence = if phases.is_empty() {
        0.0
    } else {
        phases.iter().map(|p| p.confidence).sum::<f32>() / phases.len() as f32
    };
    metrics.confidence = (coverage * phase_confidence).clamp(0.0, 1.0);

    metrics.feedback = feedback(&metrics, config);
    metrics.key_improvements = key_improvements(&metrics, config.club_type);

    if metrics.raw_values().is_empty() {
        log::warn!("No swing metric could be measured; every category scores 0");
    }

    log::debug!(
        "Swing scored {:.1} ({}), coverage {:.2}, confidence {:.2}",
        metrics.overall_score,
        metrics.letter_grade.as_str(),
        coverage,
        metrics.confidence
    );

    metrics
}

/// Mean corridor score over the measured values; 0 if none are measured
fn category_score(values: &[(MetricKind, Option<f32>)], level: SkillLevel) -> f32 {
    let scores: Vec<f32> = values
        .iter()
        .filter_map(|(kind, value)| value.map(|v| corridor(*kind, level).score(v)))
        .collect();
    if scores.is_empty() {
        0.0
    } else {
        mean(&scores)
    }
}

fn tempo_metrics(phases: &[Phase], level: SkillLevel) -> TempoMetrics {
    let backswing_ms = find_phase(phases, PhaseName::Backswing).map_or(0.0, |p| p.duration_ms);
    let downswing_ms = find_phase(phases, PhaseName::Downswing).map_or(0.0, |p| p.duration_ms);
    let ratio = tempo_ratio(backswing_ms, downswing_ms);
    TempoMetrics {
        ratio,
        backswing_ms,
        downswing_ms,
        score: category_score(&[(MetricKind::TempoRatio, ratio)], level),
    }
}

/// Backswing / downswing, or `None` without a usable downswing
pub(crate) fn tempo_ratio(backswing_ms: f32, downswing_ms: f32) -> Option<f32> {
    if downswing_ms > 0.0 && backswing_ms > 0.0 && backswing_ms.is_finite() {
        Some(backswing_ms / downswing_ms)
    } else {
        None
    }
}

fn rotation_metrics(
    phases: &[Phase],
    measures: &[BodyMeasures],
    timestamps: &[f32],
    level: SkillLevel,
) -> RotationMetrics {
    let (shoulder_ref, hip_ref) = reference_headings(measures);
    let top = find_phase(phases, PhaseName::Top).and_then(|p| measures.get(p.start_frame));

    let shoulder_turn_deg = top.and_then(|m| rotation_deg(m.shoulder_heading, shoulder_ref));
    let hip_turn_deg = top.and_then(|m| rotation_deg(m.hip_heading, hip_ref));
    let x_factor_deg = shoulder_turn_deg.zip(hip_turn_deg).map(|(s, h)| s - h);

    let sequence_gap_ms = sequence_gap(phases, measures, timestamps);

    RotationMetrics {
        shoulder_turn_deg,
        hip_turn_deg,
        x_factor_deg,
        sequence_gap_ms,
        score: category_score(
            &[
                (MetricKind::ShoulderRotation, shoulder_turn_deg),
                (MetricKind::HipRotation, hip_turn_deg),
                (MetricKind::XFactor, x_factor_deg),
                (MetricKind::SequenceGap, sequence_gap_ms),
            ],
            level,
        ),
    }
}

/// Delay from peak hip rotation speed to peak shoulder rotation speed
///
/// Searched from the start of the top to the end of impact. Positive when the
/// hips lead.
fn sequence_gap(phases: &[Phase], measures: &[BodyMeasures], timestamps: &[f32]) -> Option<f32> {
    let start = find_phase(phases, PhaseName::Top)?.start_frame;
    let end = find_phase(phases, PhaseName::Impact)?.end_frame.min(measures.len());
    if end <= start + 1 {
        return None;
    }

    let shoulders: Vec<Option<f32>> = measures.iter().map(|m| m.shoulder_heading).collect();
    let hips: Vec<Option<f32>> = measures.iter().map(|m| m.hip_heading).collect();
    let shoulder_speeds = rotation_speeds(&shoulders, timestamps);
    let hip_speeds = rotation_speeds(&hips, timestamps);

    let shoulder_peak = argmax_in(&shoulder_speeds, start..end)?;
    let hip_peak = argmax_in(&hip_speeds, start..end)?;
    if shoulder_speeds[shoulder_peak] <= 0.0 || hip_speeds[hip_peak] <= 0.0 {
        return None;
    }

    log::trace!(
        "Kinematic sequence: hip peak at {}, shoulder peak at {}",
        hip_peak,
        shoulder_peak
    );
    Some(timestamps.get(shoulder_peak)? - timestamps.get(hip_peak)?)
}

fn swing_plane_metrics(
    phases: &[Phase],
    frames: &[PoseFrame],
    club_path: &ClubPath,
    config: &AnalysisConfig,
) -> SwingPlaneMetrics {
    let inclinations: Vec<f32> = match find_phase(phases, PhaseName::Backswing) {
        Some(backswing) => club_path
            .points
            .iter()
            .filter(|p| backswing.contains(p.frame))
            .filter_map(|p| {
                let grip = frames
                    .get(p.frame)?
                    .joint_center(Joint::Wrist, config.min_visibility)?;
                inclination_deg(grip, p.position())
            })
            .collect(),
        None => Vec::new(),
    };

    let plane_angle_deg = if inclinations.is_empty() {
        None
    } else {
        Some(mean(&inclinations))
    };
    let plane_deviation_deg = if inclinations.len() < 2 {
        None
    } else {
        let steps: Vec<f32> = inclinations.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        Some(mean(&steps))
    };

    SwingPlaneMetrics {
        plane_angle_deg,
        plane_deviation_deg,
        score: category_score(
            &[
                (MetricKind::PlaneAngle, plane_angle_deg),
                (MetricKind::PlaneDeviation, plane_deviation_deg),
            ],
            config.skill_level,
        ),
    }
}

/// Largest |Δx| of the head from address, in address shoulder widths
fn head_displacement(address: &BodyMeasures, window: &[BodyMeasures]) -> Option<f32> {
    let origin = address.head?;
    let width = address.shoulder_width.filter(|w| *w > 0.0)?;
    let largest = window
        .iter()
        .filter_map(|m| m.head)
        .map(|h| (h.x - origin.x).abs())
        .fold(0.0f32, f32::max);
    Some(largest / width)
}

fn feedback(metrics: &SwingMetrics, config: &AnalysisConfig) -> Vec<String> {
    let club = config.club_type.name();
    let level = config.skill_level;
    let mut lines = Vec::with_capacity(5);

    lines.push(match metrics.tempo.ratio {
        None => "Tempo could not be measured from the detected phases".to_string(),
        Some(ratio) => {
            let ideal = corridor(MetricKind::TempoRatio, level).ideal;
            if metrics.tempo.score >= 80.0 {
                format!("Tempo of {:.1}:1 is well balanced for your {}", ratio, club)
            } else if ratio < ideal {
                format!(
                    "Tempo of {:.1}:1 is quick; let the {} backswing take longer before the transition",
                    ratio, club
                )
            } else {
                format!(
                    "Tempo of {:.1}:1 is slow; keep the {} downswing moving after the top",
                    ratio, club
                )
            }
        }
    });

    lines.push(match (metrics.rotation.shoulder_turn_deg, metrics.rotation.x_factor_deg) {
        (Some(shoulders), Some(x_factor)) => {
            if metrics.rotation.score >= 80.0 {
                format!(
                    "Good coil: {:.0}° shoulder turn with a {:.0}° X-factor",
                    shoulders, x_factor
                )
            } else {
                let target = corridor(MetricKind::ShoulderRotation, level).ideal;
                format!(
                    "Shoulder turn of {:.0}° against a {:.0}° target; work on separating shoulders from hips at the top",
                    shoulders, target
                )
            }
        }
        _ => "Body rotation could not be measured".to_string(),
    });

    lines.push(match metrics.weight_transfer.impact_lead_pct {
        Some(impact) if metrics.weight_transfer.score >= 80.0 => {
            format!("Solid weight shift with {:.0}% on the lead side at impact", impact)
        }
        Some(impact) => format!(
            "Only {:.0}% of your weight reaches the lead side at impact; shift forward through the {}",
            impact, club
        ),
        None => "Weight transfer could not be measured".to_string(),
    });

    lines.push(match metrics.swing_plane.plane_angle_deg {
        Some(angle) if metrics.swing_plane.score >= 80.0 => {
            format!("Consistent swing plane around {:.0}°", angle)
        }
        Some(angle) => format!(
            "Swing plane of {:.0}° wanders during the backswing; keep the {} on one plane",
            angle, club
        ),
        None => "Swing plane could not be measured from the club path".to_string(),
    });

    lines.push(match metrics.body_alignment.spine_tilt_deg {
        Some(_) if metrics.body_alignment.score >= 80.0 => {
            "Stable posture with a quiet head".to_string()
        }
        Some(tilt) => format!(
            "Posture needs work: {:.0}° spine tilt at address and {} head movement",
            tilt,
            metrics
                .body_alignment
                .head_displacement
                .map_or("unmeasured".to_string(), |h| format!("{:.2} shoulder widths of", h)),
        ),
        None => "Setup posture could not be measured".to_string(),
    });

    lines
}

fn key_improvements(metrics: &SwingMetrics, club: ClubType) -> Vec<String> {
    let mut weak: Vec<(&'static str, f32)> = metrics
        .category_scores()
        .into_iter()
        .filter(|(_, s)| *s < IMPROVEMENT_THRESHOLD)
        .collect();
    weak.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    weak.into_iter()
        .map(|(category, score)| {
            let advice = match category {
                "tempo" => "rehearse a smooth 3:1 backswing-to-downswing rhythm",
                "rotation" => "turn the shoulders fully while keeping the hips stable",
                "weight transfer" => "finish with your weight on the lead foot",
                "swing plane" => "keep the club on a consistent plane to the top",
                _ => "hold the spine angle and keep the head steady",
            };
            format!(
                "Improve {} ({:.0}/100) with your {}: {}",
                category,
                score,
                club.name(),
                advice
            )
        })
        .collect()
}
