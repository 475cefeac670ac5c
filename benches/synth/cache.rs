//! Benchmarks for cache hits against a warm cache.

use std::hint::black_box;

use criterion::Criterion;
use gestune::synth::{midi_note_to_freq, ToneCache, ToneConfig, ToneSynth};

pub fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/cache");
    let config = ToneConfig::default();
    let mut cache = ToneCache::new(ToneSynth::new(48_000.0, &config), config.cache_capacity);

    // two octaves of notes, all warm
    let freqs: Vec<f32> = (57..=81).map(midi_note_to_freq).collect();
    for &f in &freqs {
        cache.get_or_synthesize(f, 0.55);
    }

    let mut i = 0;
    group.bench_function("hit", |b| {
        b.iter(|| {
            i = (i + 1) % freqs.len();
            black_box(cache.get_or_synthesize(black_box(freqs[i]), 0.55))
        })
    });

    group.finish();
}
