//! Crash cymbal one-shot.
//!
//! A long noise wash. Half of it is ring-modulated at 5 kHz for shimmer and
//! half is left broadband; the slow decay lets it ring under the next bars.

use super::decay;

const SEED: u64 = 0xc2a5;

/// Render a crash cymbal.
pub fn crash(sample_rate: f32) -> Vec<f32> {
    let mut rng = fastrand::Rng::with_seed(SEED);
    decay(1.2, 4.0, sample_rate)
        .map(|(t, env)| {
            let noise = rng.f32() * 2.0 - 1.0;
            let shimmer = noise * (std::f32::consts::TAU * 5_000.0 * t).sin();
            (0.5 * noise + 0.5 * shimmer) * env * 0.6
        })
        .collect()
}
