//! Snare drum one-shot.
//!
//! Real snares have wires stretched across the bottom head that buzz when the
//! drum is struck. White noise stands in for the wires and a 200 Hz sine for
//! the head, mixed mostly noise.
//!
//! # Variations
//!
//! - More tone = more tom-like
//! - Slower decay = looser snare

use super::decay;

const SEED: u64 = 0x5a4e;

/// Render a snare drum.
pub fn snare(sample_rate: f32) -> Vec<f32> {
    let mut rng = fastrand::Rng::with_seed(SEED);
    decay(0.15, 20.0, sample_rate)
        .map(|(t, env)| {
            let noise = rng.f32() * 2.0 - 1.0;
            let tone = (std::f32::consts::TAU * 200.0 * t).sin();
            (0.7 * noise + 0.3 * tone) * env * 0.6
        })
        .collect()
}
