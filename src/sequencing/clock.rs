//! Swung sixteenth-note step clock.
//!
//! The clock is polled: every tick the caller passes the current time and the
//! clock answers whether the next step is due. There is no sample-accurate
//! scheduling, so small polling jitter can accumulate over a long run. That's
//! fine for live performance; don't render offline with it.
//!
//! ```text
//!   base = 60 / bpm / 4                     one sixteenth
//!   even steps: base · (1 − swing)
//!   odd steps:  base · (1 + swing)
//! ```
//!
//! At 120 BPM and swing 0.1 the base step is 125 ms, even steps wait
//! 112.5 ms and odd steps 137.5 ms; each pair still adds up to two sixteenths.

use super::pattern::STEPS;

pub const MIN_BPM: f32 = 40.0;
pub const MAX_BPM: f32 = 300.0;
pub const MAX_SWING: f32 = 0.2;

/// Slack for float error when comparing elapsed time against a step length.
const TIMING_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct SequencerClock {
    /// The step that plays next.
    current_step: usize,
    /// When the previous step fired; `None` until the first one.
    last_step_time: Option<f64>,
    bpm: f32,
    swing: f32,
}

impl SequencerClock {
    pub fn new(bpm: f32, swing: f32) -> Self {
        Self {
            current_step: 0,
            last_step_time: None,
            bpm: bpm.clamp(MIN_BPM, MAX_BPM),
            swing: swing.clamp(0.0, MAX_SWING),
        }
    }

    /// One sixteenth note in seconds, before swing.
    pub fn base_step_duration(&self) -> f64 {
        60.0 / self.bpm as f64 / 4.0
    }

    /// How long to wait before `step` plays.
    pub fn step_duration(&self, step: usize) -> f64 {
        let base = self.base_step_duration();
        let swing = self.swing as f64;
        if step % 2 == 1 {
            base * (1.0 + swing)
        } else {
            base * (1.0 - swing)
        }
    }

    /// If the current step is due at `now`, consume it and return its index.
    ///
    /// The very first poll fires step 0 immediately.
    pub fn poll(&mut self, now: f64) -> Option<usize> {
        let due = match self.last_step_time {
            None => true,
            Some(last) => now - last + TIMING_EPSILON >= self.step_duration(self.current_step),
        };
        if !due {
            return None;
        }
        let step = self.current_step;
        self.last_step_time = Some(now);
        self.current_step = (self.current_step + 1) % STEPS;
        Some(step)
    }

    /// Jump back to step 0 without disturbing the step timing.
    pub fn rewind(&mut self) {
        self.current_step = 0;
    }

    /// Forget all timing; the next poll fires step 0 immediately.
    pub fn restart(&mut self) {
        self.current_step = 0;
        self.last_step_time = None;
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn last_step_time(&self) -> Option<f64> {
        self.last_step_time
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
    }

    pub fn swing(&self) -> f32 {
        self.swing
    }

    pub fn set_swing(&mut self, swing: f32) {
        self.swing = swing.clamp(0.0, MAX_SWING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swing_law_at_120_bpm() {
        let clock = SequencerClock::new(120.0, 0.1);
        assert!((clock.base_step_duration() - 0.125).abs() < 1e-9);
        assert!((clock.step_duration(1) - 0.1375).abs() < 1e-6);
        assert!((clock.step_duration(3) - 0.1375).abs() < 1e-6);
        assert!((clock.step_duration(0) - 0.1125).abs() < 1e-6);
        assert!((clock.step_duration(2) - 0.1125).abs() < 1e-6);
    }

    #[test]
    fn clamps_bpm_and_swing() {
        let mut clock = SequencerClock::new(1_000.0, 0.9);
        assert_eq!(clock.bpm(), MAX_BPM);
        assert_eq!(clock.swing(), MAX_SWING);
        clock.set_bpm(1.0);
        clock.set_swing(-0.3);
        assert_eq!(clock.bpm(), MIN_BPM);
        assert_eq!(clock.swing(), 0.0);
    }

    #[test]
    fn first_poll_fires_step_zero() {
        let mut clock = SequencerClock::new(120.0, 0.0);
        assert_eq!(clock.poll(5.0), Some(0));
        assert_eq!(clock.poll(5.01), None);
        assert_eq!(clock.poll(5.125), Some(1));
    }

    #[test]
    fn step_wraps_modulo_sixteen() {
        let mut clock = SequencerClock::new(120.0, 0.0);
        let mut fired = Vec::new();
        let mut t = 0.0;
        while fired.len() < 20 {
            if let Some(step) = clock.poll(t) {
                fired.push(step);
            }
            t += 0.005;
        }
        let expected: Vec<usize> = (0..20).map(|i| i % STEPS).collect();
        assert_eq!(fired, expected);
    }

    #[test]
    fn swung_steps_wait_their_own_duration() {
        let mut clock = SequencerClock::new(120.0, 0.1);
        clock.poll(0.0); // step 0
        assert_eq!(clock.poll(0.13), None, "step 1 is odd and waits 137.5 ms");
        assert_eq!(clock.poll(0.1375), Some(1));
        assert_eq!(clock.poll(0.1375 + 0.1124), None);
        assert_eq!(clock.poll(0.1375 + 0.1125), Some(2));
    }

    #[test]
    fn rewind_keeps_timing() {
        let mut clock = SequencerClock::new(120.0, 0.0);
        clock.poll(0.0);
        clock.poll(0.125);
        clock.rewind();
        assert_eq!(clock.poll(0.2), None);
        assert_eq!(clock.poll(0.25), Some(0));
    }
}
