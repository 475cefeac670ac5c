//! High tom one-shot.
//!
//! Same construction as the kick, tuned up: the glide settles near 150 Hz
//! and both glide and decay are gentler, so the tone reads as pitched.

use super::pitch_sweep;

/// Render a high tom.
pub fn tom(sample_rate: f32) -> Vec<f32> {
    pitch_sweep(0.3, 260.0, 150.0, 8.0, 12.0, sample_rate)
        .into_iter()
        .map(|s| s * 0.7)
        .collect()
}
