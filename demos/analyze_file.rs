//! Example: Analyze a single swing
//!
//! Usage:
//!   cargo run --example analyze_file -- [--json] [frames.json]
//!
//! `frames.json` holds an array of pose frames
//! (`[{"timestamp_ms": 0.0, "landmarks": [{"x":..,"y":..,"z":..,"visibility":..}, ...]}, ...]`).
//! Without a file, a synthetic 150-frame swing is analyzed.

use std::env;
use std::fs;

use stratum_swing::pose::synthetic::SyntheticSwing;
use stratum_swing::{analyze_swing, AnalysisConfig, PoseFrame};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut json = false;
    let mut path: Option<String> = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => path = Some(arg),
        }
    }

    let frames: Vec<PoseFrame> = match &path {
        Some(p) => serde_json::from_str(&fs::read_to_string(p)?)?,
        None => SyntheticSwing::default().generate(),
    };

    // Configure analysis
    let config = AnalysisConfig::default();

    // Analyze
    let result = analyze_swing(&frames, None, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    // Print results
    println!("Swing Analysis ({} frames, {:.0} ms):", result.metadata.frame_count, result.metadata.duration_ms);
    for phase in &result.phases {
        println!(
            "  {:<15} frames {:>4}..{:<4} {:>7.1} ms (confidence: {:.2})",
            phase.name.name(),
            phase.start_frame,
            phase.end_frame,
            phase.duration_ms,
            phase.confidence
        );
    }
    println!(
        "  Impact: frame {} (confidence: {:.2}, agreement: {:.2})",
        result.impact_frame(),
        result.impact.confidence,
        result.impact.agreement
    );
    println!(
        "  Club path: {} points (confidence: {:.2})",
        result.club_path.len(),
        result.club_path.confidence
    );
    println!(
        "  Score: {:.1} ({})",
        result.metrics.overall_score,
        result.grade().as_str()
    );
    for (category, score) in result.metrics.category_scores() {
        println!("    {:<16} {:>5.1}", category, score);
    }
    for line in &result.metrics.feedback {
        println!("  - {}", line);
    }
    println!(
        "  Reliability: {:.2} ({:?})",
        result.validation.reliability, result.validation.grade
    );

    Ok(())
}
