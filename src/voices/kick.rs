//! Kick drum one-shot.
//!
//! A sine with a fast downward pitch glide: it starts around 150 Hz for the
//! "click" and settles at 50 Hz for the body, while the amplitude decays
//! exponentially.
//!
//! # Variations
//!
//! - Slower amplitude decay = boomy 808-style kick
//! - Higher start pitch = more attack

use super::pitch_sweep;

/// Render a kick drum.
pub fn kick(sample_rate: f32) -> Vec<f32> {
    pitch_sweep(0.4, 150.0, 50.0, 25.0, 10.0, sample_rate)
        .into_iter()
        .map(|s| s * 0.9)
        .collect()
}
