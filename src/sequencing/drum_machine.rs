//! Finger-gated 16-step drum sequencer.
//!
//! Each extended finger on the drum hand enables one instrument. When a step
//! fires, every enabled instrument with a velocity on that step in the current
//! pattern set produces a [`DrumHit`]. Making a fist advances to the next
//! pattern set; only the rising edge counts, so holding the fist switches
//! once.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    clock::SequencerClock,
    instrument::{Instrument, PerInstrument},
    pattern::PatternBank,
};
use crate::{
    gesture::HandSignals,
    trigger::{DrumHit, TriggerResult},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SequencerConfig {
    pub bpm: f32,
    /// Fraction 0..0.2 by which odd steps are lengthened and even steps shortened.
    pub swing: f32,
    /// Mix volume per instrument, indexed kick, snare, hihat, hightom, crash.
    pub volumes: PerInstrument<f32>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            swing: 0.0,
            volumes: PerInstrument([0.85, 0.8, 0.6, 0.7, 0.7]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepSequencer {
    clock: SequencerClock,
    bank: PatternBank,
    volumes: PerInstrument<f32>,
    fist_was_closed: bool,
}

impl StepSequencer {
    pub fn new(config: &SequencerConfig, bank: PatternBank) -> Self {
        let mut volumes = config.volumes;
        for v in volumes.0.iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }
        Self {
            clock: SequencerClock::new(config.bpm, config.swing),
            bank,
            volumes,
            fist_was_closed: false,
        }
    }

    /// Advance the sequencer to `now`.
    ///
    /// `hand` is the drum hand's signals, `None` when it's absent or outside
    /// its zone. Results come back in order: a pattern change (if any) first,
    /// then the step that fired (if any).
    pub fn tick(&mut self, hand: Option<&HandSignals>, now: f64) -> Vec<TriggerResult> {
        let mut results = Vec::new();

        let fist = hand.is_some_and(|h| h.fist);
        if fist && !self.fist_was_closed {
            let index = self.bank.advance();
            self.clock.rewind();
            results.push(TriggerResult::PatternChanged { index });
        }
        self.fist_was_closed = fist;

        if let Some(step) = self.clock.poll(now) {
            let hits = self.hits_for(step, hand);
            results.push(TriggerResult::DrumStep { step, hits, time: now });
        }

        results
    }

    /// Hits produced by `step` for the fingers currently extended on `hand`.
    pub fn hits_for(&self, step: usize, hand: Option<&HandSignals>) -> Vec<DrumHit> {
        let Some(hand) = hand else {
            return Vec::new();
        };
        let pattern = self.bank.current();
        Instrument::ALL
            .iter()
            .filter(|inst| hand.fingers.is_extended(inst.finger()))
            .filter_map(|&instrument| {
                pattern.velocity(instrument, step).map(|velocity| DrumHit {
                    instrument,
                    step,
                    velocity,
                    volume: self.volumes[instrument],
                })
            })
            .collect()
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        self.clock.set_bpm(bpm);
    }

    pub fn bpm(&self) -> f32 {
        self.clock.bpm()
    }

    pub fn set_swing(&mut self, swing: f32) {
        self.clock.set_swing(swing);
    }

    pub fn swing(&self) -> f32 {
        self.clock.swing()
    }

    /// Select a pattern set directly. Resets to step 0; out-of-range
    /// indices are ignored and return false.
    pub fn select_pattern(&mut self, index: usize) -> bool {
        let ok = self.bank.select(index);
        if ok {
            self.clock.rewind();
        }
        ok
    }

    /// Advance to the next pattern set, resetting to step 0.
    pub fn next_pattern(&mut self) -> usize {
        self.clock.rewind();
        self.bank.advance()
    }

    pub fn set_volume(&mut self, instrument: Instrument, volume: f32) {
        self.volumes[instrument] = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self, instrument: Instrument) -> f32 {
        self.volumes[instrument]
    }

    pub fn pattern_index(&self) -> usize {
        self.bank.current_index()
    }

    pub fn pattern_count(&self) -> usize {
        self.bank.len()
    }

    pub fn bank(&self) -> &PatternBank {
        &self.bank
    }

    pub fn clock(&self) -> &SequencerClock {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{FingerStates, Hand};

    fn hand(fingers: [bool; 5]) -> HandSignals {
        let fingers = FingerStates(fingers);
        HandSignals {
            hand: Hand::Right,
            height: 0.5,
            pinch: 0.1,
            openness: 0.5,
            fingers,
            fist: fingers.is_fist(),
            pointing: fingers.is_pointing(),
            peace: fingers.is_peace(),
            in_zone: true,
            timestamp: 0.0,
        }
    }

    fn sequencer() -> StepSequencer {
        StepSequencer::new(&SequencerConfig::default(), PatternBank::default())
    }

    fn pattern_changes(results: &[TriggerResult]) -> usize {
        results
            .iter()
            .filter(|r| matches!(r, TriggerResult::PatternChanged { .. }))
            .count()
    }

    #[test]
    fn only_extended_fingers_play() {
        let seq = sequencer();
        // index (kick) + middle (snare); pattern 0 step 0 has kick, crash, hihat
        let h = hand([false, true, true, false, false]);
        let hits = seq.hits_for(0, Some(&h));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].instrument, Instrument::Kick);
        assert_eq!(hits[0].velocity, 1.0);
        assert!((hits[0].volume - 0.85).abs() < 1e-6);
    }

    #[test]
    fn absent_hand_keeps_clock_running_silently() {
        let mut seq = sequencer();
        let results = seq.tick(None, 0.0);
        assert_eq!(
            results,
            vec![TriggerResult::DrumStep { step: 0, hits: vec![], time: 0.0 }]
        );
        assert_eq!(seq.clock().current_step(), 1);
    }

    #[test]
    fn sustained_fist_switches_once() {
        let mut seq = sequencer();
        let fist = hand([false; 5]);
        let mut switches = 0;
        for i in 0..10 {
            switches += pattern_changes(&seq.tick(Some(&fist), i as f64 * 0.01));
        }
        assert_eq!(switches, 1);
        assert_eq!(seq.pattern_index(), 1);
    }

    #[test]
    fn fist_open_fist_switches_twice() {
        let mut seq = sequencer();
        let fist = hand([false; 5]);
        let open = hand([true; 5]);
        let mut switches = 0;
        for (i, h) in [&fist, &open, &fist].iter().enumerate() {
            switches += pattern_changes(&seq.tick(Some(h), i as f64 * 0.01));
        }
        assert_eq!(switches, 2);
        assert_eq!(seq.pattern_index(), 2);
    }

    #[test]
    fn switching_resets_to_step_zero() {
        let mut seq = sequencer();
        let open = hand([true; 5]);
        seq.tick(Some(&open), 0.0);
        seq.tick(Some(&open), 0.125);
        assert_eq!(seq.clock().current_step(), 2);

        let results = seq.tick(Some(&hand([false; 5])), 0.25);
        assert_eq!(results[0], TriggerResult::PatternChanged { index: 1 });
        assert!(matches!(results[1], TriggerResult::DrumStep { step: 0, .. }));
    }

    #[test]
    fn each_step_fires_once_per_occurrence() {
        let mut seq = sequencer();
        let open = hand([false, true, false, false, false]);
        let mut kicks_on_zero = 0;
        let mut t = 0.0;
        // one full bar at 120 BPM is 2 s; poll every 2 ms
        while t < 1.99 {
            for r in seq.tick(Some(&open), t) {
                if let TriggerResult::DrumStep { step: 0, hits, .. } = r {
                    kicks_on_zero += hits.len();
                }
            }
            t += 0.002;
        }
        assert_eq!(kicks_on_zero, 1);
    }

    #[test]
    fn volumes_are_clamped() {
        let mut seq = sequencer();
        seq.set_volume(Instrument::Snare, 4.0);
        assert_eq!(seq.volume(Instrument::Snare), 1.0);
    }
}
