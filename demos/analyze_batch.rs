//! Example: Analyze multiple swings in parallel
//!
//! Usage:
//!   cargo run --release --example analyze_batch -- [--jobs N] [--json] [--tier T] <frames1.json> <frames2.json> ...
//!
//! Notes:
//! - Parallelism is across swings (batch-level). Each analysis is still single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.
//! - `--synthetic N` analyzes N generated swings of varying length instead of files.

use rayon::prelude::*;
use std::env;
use std::fs;
use std::time::Instant;
use stratum_swing::analysis::confidence::compute_confidence;
use stratum_swing::pose::synthetic::SyntheticSwing;
use stratum_swing::{analyze_swing, AnalysisConfig, PoseFrame, SkillLevel};

fn load_frames(path: &str) -> Result<Vec<PoseFrame>, Box<dyn std::error::Error + Send + Sync>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn parse_tier(name: &str) -> Option<SkillLevel> {
    SkillLevel::ALL.iter().copied().find(|l| l.name() == name)
}

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn percentile(mut xs: Vec<f32>, p: f32) -> Option<f32> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((xs.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
    Some(xs[idx.min(xs.len() - 1)])
}

enum Source {
    File(String),
    Synthetic(usize),
}

impl Source {
    fn label(&self) -> String {
        match self {
            Source::File(p) => p.clone(),
            Source::Synthetic(n) => format!("synthetic-{}", n),
        }
    }

    fn frames(&self) -> Result<Vec<PoseFrame>, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            Source::File(p) => load_frames(p),
            Source::Synthetic(n) => Ok(SyntheticSwing::with_frames(*n).jitter(0.001).generate()),
        }
    }
}

struct ItemOut {
    label: String,
    ok: bool,
    frames: usize,
    impact_frame: usize,
    impact_conf: f32,
    overall_score: f32,
    grade: String,
    reliability: f32,
    confidence_level: &'static str,
    wall_ms: f32,
    error: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut config = AnalysisConfig::default();
    let mut sources: Vec<Source> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--tier" => {
                let v = args.first().ok_or("--tier requires a value")?.clone();
                args.remove(0);
                config.skill_level = parse_tier(&v).ok_or("unknown tier")?;
            }
            "--synthetic" => {
                let v = args
                    .first()
                    .ok_or("--synthetic requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                sources.extend((0..v).map(|i| Source::Synthetic(90 + 15 * (i % 8))));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: analyze_batch [--jobs N] [--json] [--tier T] [--synthetic N] <frames1.json> ...\n\
                     \n\
                     --jobs N       Parallel workers (default: CPU-1)\n\
                     --json         Emit one JSON object per line (JSONL)\n\
                     --tier T       beginner | intermediate | advanced | professional\n\
                     --synthetic N  Analyze N generated swings\n"
                );
                return Ok(());
            }
            _ => sources.push(Source::File(a)),
        }
    }

    if sources.is_empty() {
        eprintln!("ERROR: Provide at least one frames file or --synthetic N. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} swings, jobs={}, tier={}", sources.len(), jobs, config.skill_level.name());

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<ItemOut> = pool.install(|| {
        sources
            .par_iter()
            .map(|source| {
                let label = source.label();
                let started = Instant::now();
                let failed = |error: String| ItemOut {
                    label: label.clone(),
                    ok: false,
                    frames: 0,
                    impact_frame: 0,
                    impact_conf: 0.0,
                    overall_score: 0.0,
                    grade: String::new(),
                    reliability: 0.0,
                    confidence_level: "Low",
                    wall_ms: 0.0,
                    error: Some(error),
                };
                let frames = match source.frames() {
                    Ok(frames) => frames,
                    Err(e) => return failed(format!("load failed: {e}")),
                };
                match analyze_swing(&frames, None, &config) {
                    Ok(res) => {
                        let conf = compute_confidence(&res.phases, &res.impact, &res.club_path);
                        ItemOut {
                            label: label.clone(),
                            ok: true,
                            frames: frames.len(),
                            impact_frame: res.impact_frame(),
                            impact_conf: res.impact.confidence,
                            overall_score: res.metrics.overall_score,
                            grade: res.grade().as_str().to_string(),
                            reliability: res.validation.reliability,
                            confidence_level: conf.confidence_level(),
                            wall_ms: started.elapsed().as_secs_f32() * 1000.0,
                            error: None,
                        }
                    }
                    Err(e) => failed(format!("analysis failed: {e}")),
                }
            })
            .collect()
    });

    if json {
        for o in &outs {
            if o.ok {
                println!(
                    "{{\"swing\":{},\"frames\":{},\"impact_frame\":{},\"impact_confidence\":{:.4},\"overall_score\":{:.2},\"grade\":{},\"reliability\":{:.4},\"confidence_level\":{}}}",
                    serde_json::to_string(&o.label)?,
                    o.frames,
                    o.impact_frame,
                    o.impact_conf,
                    o.overall_score,
                    serde_json::to_string(&o.grade)?,
                    o.reliability,
                    serde_json::to_string(o.confidence_level)?,
                );
            } else {
                println!(
                    "{{\"swing\":{},\"error\":{}}}",
                    serde_json::to_string(&o.label)?,
                    serde_json::to_string(o.error.as_deref().unwrap_or("unknown error"))?
                );
            }
        }
    } else {
        for (idx, o) in outs.iter().enumerate() {
            if o.ok {
                println!(
                    "[{}/{}] {}: frames={} impact={} (conf={:.3}) score={:.1} {} reliability={:.2} ({}) time={:.2}ms",
                    idx + 1,
                    outs.len(),
                    o.label,
                    o.frames,
                    o.impact_frame,
                    o.impact_conf,
                    o.overall_score,
                    o.grade,
                    o.reliability,
                    o.confidence_level,
                    o.wall_ms
                );
            } else {
                println!(
                    "[{}/{}] {}: ERROR: {}",
                    idx + 1,
                    outs.len(),
                    o.label,
                    o.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    let ok_times: Vec<f32> = outs.iter().filter(|o| o.ok).map(|o| o.wall_ms).collect();
    let wall_ms = t0.elapsed().as_secs_f64() * 1000.0;

    eprintln!("Done: ok={}/{} wall={:.0}ms", ok_times.len(), outs.len(), wall_ms);
    if !ok_times.is_empty() {
        let mean = ok_times.iter().sum::<f32>() / ok_times.len() as f32;
        let p50 = percentile(ok_times.clone(), 0.50).unwrap_or(mean);
        let p90 = percentile(ok_times.clone(), 0.90).unwrap_or(mean);
        let min = ok_times.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = ok_times.iter().cloned().fold(0.0, f32::max);
        eprintln!(
            "analysis_time_ms: mean={:.2} p50={:.2} p90={:.2} min={:.2} max={:.2}",
            mean, p50, p90, min, max
        );
    }

    Ok(())
}
