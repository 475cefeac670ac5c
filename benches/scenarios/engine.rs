//! Whole-engine ticks with both hands playing.

use std::hint::black_box;

use criterion::Criterion;
use gestune::{
    gesture::{Hand, HandPose, PoseFrame},
    io::SampleBank,
    runtime::Engine,
    Config,
};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");
    let config = Config::default();

    let frame = PoseFrame::new(0.0)
        .with_hand(HandPose::new(Hand::Left).height(0.6).build())
        .with_hand(HandPose::new(Hand::Right).fingers([true; 5]).build());

    group.bench_function("ingest", |b| {
        let mut engine = Engine::with_samples(&config, 48_000.0, SampleBank::synthesized(48_000.0));
        b.iter(|| engine.ingest(black_box(&frame)))
    });

    group.bench_function("tick_2ms", |b| {
        let mut engine = Engine::with_samples(&config, 48_000.0, SampleBank::synthesized(48_000.0));
        engine.ingest(&frame);
        let mut now = 0.0;
        let mut scratch = vec![0.0f32; 96];
        let mixer = engine.mixer();
        b.iter(|| {
            now += 0.002;
            let events = engine.tick(black_box(now));
            // drain the pool as the output callback would
            gestune::engine::lock_mixer(&mixer).render(&mut scratch);
            black_box(events)
        })
    });

    group.finish();
}
