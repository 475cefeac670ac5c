//! Mixing a full channel pool into one output block.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use gestune::{
    engine::{ChannelConfig, ChannelPool},
    io::SampleBank,
    sequencing::Instrument,
};

use crate::BLOCK_SIZES;

pub fn bench_channels(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/channels");
    let mut samples = SampleBank::synthesized(48_000.0);
    let config = ChannelConfig::default();

    for &size in BLOCK_SIZES {
        let mut out = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("full_pool", size), &size, |b, _| {
            let mut pool = ChannelPool::new(48_000.0, &config);
            b.iter(|| {
                // keep the pool saturated: top up whatever finished
                while pool.active_count() < pool.capacity() {
                    let Some(crash) = samples.get(Instrument::Crash) else {
                        break;
                    };
                    if pool.play(crash, 0.5).is_none() {
                        break;
                    }
                }
                pool.render(black_box(&mut out));
            })
        });
    }

    group.finish();
}
