//! Harmonic tone synthesis: `(frequency, duration) -> buffer`.
//!
//! The output is mono, envelope-applied and normalized to unit peak before the
//! envelope goes on. Volume is never baked in; callers scale gain at playback
//! time so the same buffer can be reused for every note at that pitch.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        envelope::ToneEnvelope,
        oscillator::{self, Partial, DEFAULT_PARTIALS},
    },
    AudioBuffer,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ToneConfig {
    pub partials: Vec<Partial>,
    pub envelope: ToneEnvelope,
    /// Maximum number of cached buffers; 0 disables caching.
    pub cache_capacity: usize,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            partials: DEFAULT_PARTIALS.to_vec(),
            envelope: ToneEnvelope::default(),
            cache_capacity: 64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToneSynth {
    sample_rate: f32,
    partials: Vec<Partial>,
    envelope: ToneEnvelope,
}

impl ToneSynth {
    pub fn new(sample_rate: f32, config: &ToneConfig) -> Self {
        Self {
            sample_rate,
            partials: config.partials.clone(),
            envelope: config.envelope,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Render a unit-amplitude tone with the envelope applied.
    pub fn synthesize(&self, frequency: f32, duration: f32) -> AudioBuffer {
        self.render(frequency, duration).into()
    }

    pub(crate) fn render(&self, frequency: f32, duration: f32) -> Vec<f32> {
        let len = oscillator::sample_count(duration, self.sample_rate);
        let mut wave = oscillator::render_partials(frequency, &self.partials, self.sample_rate, len);
        oscillator::normalize_peak(&mut wave);
        self.envelope.apply(&mut wave);
        wave
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::{num_complex::Complex, FftPlanner};

    const SR: f32 = 8_000.0;

    #[test]
    fn length_follows_duration() {
        let synth = ToneSynth::new(SR, &ToneConfig::default());
        assert_eq!(synth.synthesize(440.0, 0.25).len(), 2_000);
    }

    #[test]
    fn peak_never_exceeds_unity() {
        let synth = ToneSynth::new(SR, &ToneConfig::default());
        let buf = synth.synthesize(330.0, 0.5);
        let peak = buf.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(peak <= 1.0 + 1e-6);
        assert!(peak > 0.9, "sustain segment reaches the normalized peak");
    }

    #[test]
    fn identical_inputs_give_identical_buffers() {
        let synth = ToneSynth::new(SR, &ToneConfig::default());
        let a = synth.synthesize(261.6, 0.3);
        let b = synth.synthesize(261.6, 0.3);
        assert_eq!(&a[..], &b[..]);
    }

    #[test]
    fn zero_weight_partials_stay_silent() {
        let config = ToneConfig {
            partials: vec![Partial::new(1.0, 0.0)],
            ..ToneConfig::default()
        };
        let buf = ToneSynth::new(SR, &config).synthesize(440.0, 0.1);
        assert!(buf.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn spectrum_peaks_at_the_fundamental_then_harmonics() {
        // 0.5 s at 8 kHz: 4000 bins of 2 Hz each.
        let synth = ToneSynth::new(SR, &ToneConfig::default());
        let buf = synth.synthesize(250.0, 0.5);

        let mut spectrum: Vec<Complex<f32>> = buf.iter().map(|&s| Complex::new(s, 0.0)).collect();
        FftPlanner::new().plan_fft_forward(spectrum.len()).process(&mut spectrum);
        let mag = |hz: f32| spectrum[(hz / 2.0) as usize].norm();

        assert!(mag(250.0) > mag(500.0));
        assert!(mag(500.0) > mag(750.0));
        assert!(mag(750.0) > 10.0 * mag(375.0), "nothing between the harmonics");
    }
}
