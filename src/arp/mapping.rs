//! Hand signal to note and volume curves.
//!
//! ```text
//!   note   = base + floor(height · range)          clamped to [base, base + range]
//!
//!   p      = clamp(pinch · pinch_scale, 0, 1)
//!   volume = clamp((1 − p)^k, min, max)
//!
//!   volume
//!   max ┤■■■■■■■■■■■■■■■■■■┐
//!       │                   ╲___
//!       │                       ╲______
//!   min ┤                              ■■■■■■■■■■
//!       └────────────────────────────────────── pinch
//!        touching                         wide open
//! ```
//!
//! Open fingers (large pinch distance) are quiet and a closed pinch is loud.
//! With k > 1 the curve is steep near the closed end, so small movements near
//! a full pinch move the volume a lot while the open end flattens out at
//! `min`.

use super::ArpConfig;

/// MIDI note for a hand height in 0..1.
pub fn map_note(height: f32, config: &ArpConfig) -> u8 {
    let h = height.clamp(0.0, 1.0);
    let range = config.range_semitones as f32;
    let offset = (h * range).floor().clamp(0.0, range) as i32;
    clamp_note(config.base_note as i32 + offset)
}

/// Volume 0..1 for a pinch distance, decreasing as the fingers open.
pub fn map_volume(pinch: f32, config: &ArpConfig) -> f32 {
    let p = (pinch.max(0.0) * config.pinch_scale).clamp(0.0, 1.0);
    let min = config.min_volume.clamp(0.0, 1.0);
    let max = config.max_volume.clamp(min, 1.0);
    (1.0 - p).powf(config.volume_curve).clamp(min, max)
}

pub(crate) fn clamp_note(note: i32) -> u8 {
    note.clamp(0, 127) as u8
}
