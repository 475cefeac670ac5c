#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Tone Envelope and Fades
=======================

Two amplitude shapers live here.

ToneEnvelope is baked into a synthesized buffer once, at synthesis time.
Fade is applied live by the channel pool while a buffer is playing.


ToneEnvelope: Attack / Sustain / Release as Fractions
-----------------------------------------------------

Tones are rendered to a fixed length up front, so the envelope doesn't need a
gate or a state machine. Attack and release are expressed as fractions of the
total buffer length instead of seconds:

  Level
    1.0 ┐    ┌──────────────────┐
        │   ╱                    ╲
        │  ╱                      ╲
    0.0 └─╱────────────────────────╲──→ Samples
         attack     sustain       release
        (a·len)   (flat at 1.0)   (r·len)

With attack = 0.1 and release = 0.3 a 500 ms note spends 50 ms rising,
300 ms flat and 150 ms falling. Shorter notes scale the same way, so a fast
arpeggio never loses its attack or gets chopped mid-release.

If the two fractions sum past 1.0 they are scaled down proportionally so the
ramps meet in the middle with no sustain at all.


Curves
------

  Linear       gain = p                         straight ramps, punchy
  Exponential  gain = (e^(k·p) − 1)/(e^k − 1)   slow start, fast finish

where p runs 0 → 1 across the attack and 1 → 0 across the release. The
exponential curve is closer to how acoustic sounds decay but both end
exactly on 0 and 1.


Fade: Live Linear Ramp to Silence
---------------------------------

A fade snapshots the level it starts from and the number of samples it
should take, then interpolates linearly:

    gain = start · (1 − elapsed/total)

Snapshotting instead of accumulating a per-sample decrement guarantees the
ramp lands on exactly 0.0, no matter how long it runs.
*/

/// Shape of the attack and release ramps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeCurve {
    #[default]
    Linear,
    Exponential,
}

/// Steepness of the exponential curve.
const EXP_K: f32 = 5.0;

impl EnvelopeCurve {
    /// Map linear progress `p` in `0..=1` onto the curve.
    #[inline]
    pub fn shape(self, p: f32) -> f32 {
        let p = p.clamp(0.0, 1.0);
        match self {
            EnvelopeCurve::Linear => p,
            EnvelopeCurve::Exponential => ((EXP_K * p).exp() - 1.0) / (EXP_K.exp() - 1.0),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEnvelope {
    /// Share of the buffer spent rising from 0 to 1.
    pub attack: f32,
    /// Share of the buffer spent falling from 1 to 0.
    pub release: f32,
    pub curve: EnvelopeCurve,
}

impl Default for ToneEnvelope {
    fn default() -> Self {
        Self {
            attack: 0.1,
            release: 0.3,
            curve: EnvelopeCurve::Linear,
        }
    }
}

impl ToneEnvelope {
    pub fn new(attack: f32, release: f32, curve: EnvelopeCurve) -> Self {
        Self {
            attack,
            release,
            curve,
        }
    }

    /// Attack and release lengths in samples for a buffer of `len` samples.
    pub fn segment_lengths(&self, len: usize) -> (usize, usize) {
        let mut attack = self.attack.max(0.0);
        let mut release = self.release.max(0.0);
        let total = attack + release;
        if total > 1.0 {
            attack /= total;
            release /= total;
        }
        let a = (len as f32 * attack) as usize;
        let r = ((len as f32 * release) as usize).min(len - a);
        (a, r)
    }

    /// Gain at sample `i` of a buffer `len` samples long.
    /// Out-of-range samples are silent.
    pub fn gain_at(&self, i: usize, len: usize) -> f32 {
        if i >= len {
            return 0.0;
        }
        let (a, r) = self.segment_lengths(len);
        if i < a {
            self.curve.shape(i as f32 / a as f32)
        } else if i >= len - r {
            // Last sample of the release lands on zero.
            let remaining = (len - 1 - i) as f32;
            self.curve.shape(remaining / r.max(1) as f32)
        } else {
            1.0
        }
    }

    /// Multiply the envelope into `buffer` in place.
    pub fn apply(&self, buffer: &mut [f32]) {
        let len = buffer.len();
        if len == 0 {
            return;
        }
        let (a, r) = self.segment_lengths(len);
        for (i, sample) in buffer.iter_mut().enumerate() {
            let gain = if i < a {
                self.curve.shape(i as f32 / a as f32)
            } else if i >= len - r {
                self.curve.shape((len - 1 - i) as f32 / r.max(1) as f32)
            } else {
                continue;
            };
            *sample *= gain;
        }
    }
}

/// Linear ramp from a snapshotted level down to silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    start_level: f32,
    total_samples: u32,
    elapsed_samples: u32,
}

impl Fade {
    pub fn new(start_level: f32, seconds: f32, sample_rate: f32) -> Self {
        Self {
            start_level: start_level.clamp(0.0, 1.0),
            total_samples: (seconds * sample_rate).round().max(1.0) as u32,
            elapsed_samples: 0,
        }
    }

    /// Gain for the next sample, advancing the ramp.
    #[inline]
    pub fn next_gain(&mut self) -> f32 {
        let progress = self.elapsed_samples as f32 / self.total_samples as f32;
        let gain = (self.start_level * (1.0 - progress)).max(0.0);
        self.elapsed_samples = self.elapsed_samples.saturating_add(1);
        gain
    }

    /// Current gain without advancing.
    pub fn level(&self) -> f32 {
        let progress = self.elapsed_samples as f32 / self.total_samples as f32;
        (self.start_level * (1.0 - progress)).max(0.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_samples >= self.total_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sustain_is_flat_at_one() {
        let env = ToneEnvelope::default();
        let mut buf = vec![1.0; 1_000];
        env.apply(&mut buf);

        assert_eq!(buf[0], 0.0, "attack starts from silence");
        assert_eq!(buf[500], 1.0);
        assert_eq!(buf[999], 0.0, "release ends on silence");
        assert!(buf[50] > buf[10], "attack rises");
        assert!(buf[900] < buf[750], "release falls");
    }

    #[test]
    fn apply_agrees_with_gain_at() {
        let env = ToneEnvelope::new(0.2, 0.2, EnvelopeCurve::Exponential);
        let mut buf = vec![1.0; 333];
        env.apply(&mut buf);
        for (i, &s) in buf.iter().enumerate() {
            assert!((s - env.gain_at(i, 333)).abs() < 1e-6, "sample {i}");
        }
    }

    #[test]
    fn empty_and_out_of_range_are_silent() {
        let env = ToneEnvelope::default();
        assert_eq!(env.gain_at(0, 0), 0.0);
        assert_eq!(env.gain_at(10, 10), 0.0);
        env.apply(&mut []);
    }

    #[test]
    fn oversized_fractions_are_scaled_down() {
        let env = ToneEnvelope::new(0.8, 0.8, EnvelopeCurve::Linear);
        let (a, r) = env.segment_lengths(100);
        assert_eq!(a + r, 100);
    }

    #[test]
    fn exponential_curve_hits_endpoints() {
        let c = EnvelopeCurve::Exponential;
        assert!(c.shape(0.0).abs() < 1e-6);
        assert!((c.shape(1.0) - 1.0).abs() < 1e-6);
        assert!(c.shape(0.5) < 0.5);
    }

    #[test]
    fn fade_reaches_zero() {
        let mut fade = Fade::new(0.8, 0.01, 1_000.0);
        let first = fade.next_gain();
        assert!((first - 0.8).abs() < 1e-6);
        for _ in 0..9 {
            fade.next_gain();
        }
        assert!(fade.is_finished());
        assert!(fade.level() <= 1e-6);
    }
}
