//! Real-world scenario benchmarks.
//!
//! These model a live performance: a busy channel pool being mixed by the
//! output callback, the drum machine polled by the scheduler, and the whole
//! engine ticking with both hands in view.

mod channels;
mod engine;
mod sequencer;

pub use channels::bench_channels;
pub use engine::bench_engine;
pub use sequencer::bench_sequencer;
