//! Step sequencer ticks with an open drum hand.

use std::hint::black_box;

use criterion::Criterion;
use gestune::{
    gesture::{GestureConfig, GestureProcessor, Hand, HandPose, PoseFrame},
    sequencing::{PatternBank, SequencerConfig, StepSequencer},
};

pub fn bench_sequencer(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/sequencer");

    let mut gesture = GestureProcessor::new(GestureConfig::default());
    gesture.ingest(&PoseFrame::new(0.0).with_hand(HandPose::new(Hand::Right).fingers([true; 5]).build()));
    let Some(hand) = gesture.active(Hand::Right).copied() else {
        return;
    };

    group.bench_function("tick_2ms", |b| {
        let mut seq = StepSequencer::new(&SequencerConfig::default(), PatternBank::default());
        let mut now = 0.0;
        b.iter(|| {
            now += 0.002;
            black_box(seq.tick(Some(black_box(&hand)), now))
        })
    });

    group.finish();
}
