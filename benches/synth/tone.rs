//! Benchmarks for uncached tone rendering.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use gestune::synth::{ToneConfig, ToneSynth};

pub fn bench_tone(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/tone");
    let synth = ToneSynth::new(48_000.0, &ToneConfig::default());

    // 0.55 s is one beat at 120 BPM plus overlap; 0.2 s is a fast arpeggio
    for &duration in &[0.2f32, 0.55] {
        group.bench_with_input(
            BenchmarkId::new("synthesize", format!("{duration}s")),
            &duration,
            |b, &d| b.iter(|| synth.synthesize(black_box(220.0), black_box(d))),
        );
    }

    group.finish();
}
