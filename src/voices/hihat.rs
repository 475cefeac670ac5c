//! Closed hi-hat one-shot.
//!
//! A very short burst of noise ring-modulated by an 8 kHz sine. The ring
//! modulation pushes the noise energy up around the carrier, which is cheaper
//! than a proper high-pass and bright enough for a hat.

use super::decay;

const SEED: u64 = 0x4a7;

/// Render a closed hi-hat.
pub fn hihat(sample_rate: f32) -> Vec<f32> {
    let mut rng = fastrand::Rng::with_seed(SEED);
    decay(0.08, 40.0, sample_rate)
        .map(|(t, env)| {
            let noise = rng.f32() * 2.0 - 1.0;
            let carrier = (std::f32::consts::TAU * 8_000.0 * t).sin();
            noise * carrier * env * 0.5
        })
        .collect()
}
