//! Performance benchmarks for swing analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stratum_swing::analysis::streaming::StreamingAnalyzer;
use stratum_swing::features::club_path::estimate_path;
use stratum_swing::pose::synthetic::SyntheticSwing;
use stratum_swing::{analyze_swing, AnalysisConfig};

fn bench_analyze_swing(c: &mut Criterion) {
    // 150 frames at 30 fps (5 seconds)
    let frames = SyntheticSwing::default().jitter(0.002).generate();
    let config = AnalysisConfig::default();

    c.bench_function("analyze_swing_150_frames", |b| {
        b.iter(|| {
            let _ = analyze_swing(black_box(&frames), None, black_box(&config));
        });
    });

    let timestamps: Vec<f32> = frames.iter().map(|f| f.timestamp_ms).collect();
    c.bench_function("estimate_path_150_frames", |b| {
        b.iter(|| estimate_path(black_box(&frames), black_box(&timestamps), None, &config));
    });
}

fn bench_streaming(c: &mut Criterion) {
    let frames = SyntheticSwing::default().generate();
    let config = AnalysisConfig {
        streaming_window_capacity: 60,
        ..AnalysisConfig::default()
    };

    c.bench_function("streaming_150_pushes_window_60", |b| {
        b.iter(|| {
            let mut live = StreamingAnalyzer::new(config.clone());
            for frame in frames.iter().cloned() {
                let _ = live.push_frame(black_box(frame));
            }
        });
    });
}

criterion_group!(benches, bench_analyze_swing, bench_streaming);
criterion_main!(benches);
