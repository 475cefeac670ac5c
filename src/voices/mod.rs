//! Synthesized drum one-shots.
//!
//! These back an instrument when no recorded sample is available. Each voice
//! is rendered once into a buffer at the engine's sample rate and played back
//! like any loaded sample.
//!
//! Noise is drawn from a seeded generator, so the same voice rendered twice
//! is bit-identical.
//!
//! # Example
//!
//! ```
//! use gestune::{sequencing::Instrument, voices};
//!
//! let kick = voices::render(Instrument::Kick, 48_000.0);
//! assert!(!kick.is_empty());
//! ```

mod crash;
mod hihat;
mod kick;
mod snare;
mod tom;

pub use crash::crash;
pub use hihat::hihat;
pub use kick::kick;
pub use snare::snare;
pub use tom::tom;

use crate::{dsp::oscillator::sample_count, sequencing::Instrument};

/// Render the synthesized one-shot for `instrument`.
pub fn render(instrument: Instrument, sample_rate: f32) -> Vec<f32> {
    match instrument {
        Instrument::Kick => kick(sample_rate),
        Instrument::Snare => snare(sample_rate),
        Instrument::HiHat => hihat(sample_rate),
        Instrument::HighTom => tom(sample_rate),
        Instrument::Crash => crash(sample_rate),
    }
}

/// Exponential decay `e^(-rate·t)` sampled over `duration` seconds.
fn decay(duration: f32, rate: f32, sample_rate: f32) -> impl Iterator<Item = (f32, f32)> {
    (0..sample_count(duration, sample_rate)).map(move |i| {
        let t = i as f32 / sample_rate;
        (t, (-rate * t).exp())
    })
}

/// Sine whose frequency glides from `start` down toward `end`.
fn pitch_sweep(
    duration: f32,
    start: f32,
    end: f32,
    sweep_rate: f32,
    amp_rate: f32,
    sample_rate: f32,
) -> Vec<f32> {
    let dt = 1.0 / sample_rate;
    let mut phase = 0.0f32;
    decay(duration, amp_rate, sample_rate)
        .map(|(t, env)| {
            let freq = end + (start - end) * (-sweep_rate * t).exp();
            let s = (std::f32::consts::TAU * phase).sin() * env;
            phase = (phase + freq * dt).fract();
            s
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_instrument_renders_audible_bounded_audio() {
        for inst in Instrument::ALL {
            let buf = render(inst, 48_000.0);
            assert!(!buf.is_empty(), "{inst}");
            let peak = buf.iter().fold(0.0f32, |m, s| m.max(s.abs()));
            assert!(peak > 0.05 && peak <= 1.0, "{inst} peak {peak}");
        }
    }

    #[test]
    fn renders_are_deterministic() {
        assert_eq!(render(Instrument::Snare, 44_100.0), render(Instrument::Snare, 44_100.0));
    }

    #[test]
    fn one_shots_decay_to_near_silence() {
        for inst in Instrument::ALL {
            let buf = render(inst, 48_000.0);
            let tail = &buf[buf.len() - 64..];
            let tail_peak = tail.iter().fold(0.0f32, |m, s| m.max(s.abs()));
            assert!(tail_peak < 0.1, "{inst} tail {tail_peak}");
        }
    }
}
