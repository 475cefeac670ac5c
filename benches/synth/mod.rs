//! Benchmarks for the tone synthesizer and its cache.

mod cache;
mod tone;

pub use cache::bench_cache;
pub use tone::bench_tone;
