use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Harmonic Oscillator
===================

A pure sine is a single frequency. Real instruments add overtones at integer
multiples of the fundamental; the mix of those overtones is what we hear as
timbre. We build a tone from a short list of partials:

    wave(t) = Σ weight_k · sin(2π · ratio_k · f · t)

The default recipe is the fundamental plus two decreasing harmonics:

    ratio   weight
     1×      1.00      fundamental, the pitch you hear
     2×      0.50      one octave up
     3×      0.25      octave + fifth

That gives a rounder, "richer" tone than a bare sine at the cost of three
sin() calls per sample, far cheaper than full additive synthesis.


Why Normalize?
--------------

Partials interfere. Depending on phase alignment the summed peak can land
anywhere between the largest weight and the sum of all weights, and that
shifts with frequency. Dividing by the measured peak pins every buffer to
unit amplitude so perceived loudness doesn't jump from note to note.

A buffer that is entirely zero (zero duration, zero weights) has no peak to
divide by and is returned as-is.
*/

/// One overtone of a harmonic tone.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    /// Multiple of the fundamental frequency.
    pub ratio: f32,
    /// Linear amplitude weight.
    pub weight: f32,
}

impl Partial {
    pub const fn new(ratio: f32, weight: f32) -> Self {
        Self { ratio, weight }
    }
}

/// Fundamental plus the 2nd and 3rd harmonic at 1, 0.5, 0.25.
pub const DEFAULT_PARTIALS: [Partial; 3] = [
    Partial::new(1.0, 1.0),
    Partial::new(2.0, 0.5),
    Partial::new(3.0, 0.25),
];

/// Number of samples needed for `duration` seconds.
#[inline]
pub fn sample_count(duration: f32, sample_rate: f32) -> usize {
    (duration.max(0.0) * sample_rate) as usize
}

/// Render `partials` at `frequency` for `len` samples.
pub fn render_partials(frequency: f32, partials: &[Partial], sample_rate: f32, len: usize) -> Vec<f32> {
    let step = TAU * frequency / sample_rate;
    (0..len)
        .map(|i| {
            let phase = step * i as f32;
            partials
                .iter()
                .map(|p| p.weight * (phase * p.ratio).sin())
                .sum()
        })
        .collect()
}

/// Scale `buffer` so its largest absolute sample is 1.0.
///
/// Returns the peak found before scaling. A silent buffer is left untouched.
pub fn normalize_peak(buffer: &mut [f32]) -> f32 {
    let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    if peak > 0.0 {
        let inv = 1.0 / peak;
        for sample in buffer.iter_mut() {
            *sample *= inv;
        }
    }
    peak
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_buffer_has_unit_peak() {
        let mut buf = render_partials(220.0, &DEFAULT_PARTIALS, 48_000.0, 4_800);
        normalize_peak(&mut buf);
        let peak = buf.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!((peak - 1.0).abs() < 1e-6);
    }

    #[test]
    fn silent_buffer_is_left_alone() {
        let mut buf = vec![0.0; 64];
        assert_eq!(normalize_peak(&mut buf), 0.0);
        assert!(buf.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn sample_count_truncates() {
        assert_eq!(sample_count(0.5, 44_100.0), 22_050);
        assert_eq!(sample_count(-1.0, 44_100.0), 0);
    }
}
