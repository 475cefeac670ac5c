//! Melody hand arpeggiator.
//!
//! A two-state machine. While `Idle` nothing sounds; the first tick with the
//! hand present triggers a note and moves to `Sounding`. While sounding a new
//! note is emitted when either a full beat has passed since the last one, or
//! the mapped pitch has moved by at least `note_change_threshold` semitones
//! and `min_retrigger` seconds have passed. Losing the hand releases the note
//! and returns to `Idle`.
//!
//! ```text
//!              hand present
//!   ┌──────┐ ───────────────▶ ┌──────────┐ ─┐ beat elapsed or
//!   │ Idle │                  │ Sounding │  │ pitch moved
//!   └──────┘ ◀─────────────── └──────────┘ ◀┘ (NoteTriggered)
//!              hand absent
//!              (NoteReleased)
//! ```
//!
//! The arpeggiator only decides; it returns a [`TriggerResult`] and never
//! touches the audio engine.

pub mod mapping;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use mapping::{map_note, map_volume};

use crate::{
    gesture::HandSignals,
    sequencing::{MAX_BPM, MIN_BPM},
    synth::midi_note_to_freq,
    trigger::{NoteEvent, TriggerResult},
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ArpConfig {
    /// Tempo of a standalone arpeggiator. Inside an engine the sequencer's
    /// tempo wins.
    pub bpm: f32,
    /// MIDI note at height 0.
    pub base_note: u8,
    pub range_semitones: u8,
    /// Pinch distances are multiplied by this before the volume curve.
    pub pinch_scale: f32,
    /// Exponent `k` of the volume curve.
    pub volume_curve: f32,
    pub min_volume: f32,
    pub max_volume: f32,
    /// Tone length as a multiple of the beat; >1 leaves room for the crossfade.
    pub note_overlap: f32,
    /// Seconds that must pass before a pitch change may retrigger early.
    pub min_retrigger: f32,
    pub note_change_threshold: u8,
    /// Semitone offsets cycled through on successive notes.
    pub pattern: Vec<i8>,
}

impl Default for ArpConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            base_note: 57,
            range_semitones: 24,
            pinch_scale: 5.0,
            volume_curve: 2.0,
            min_volume: 0.1,
            max_volume: 0.8,
            note_overlap: 1.1,
            min_retrigger: 0.12,
            note_change_threshold: 1,
            pattern: vec![0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArpState {
    Idle,
    Sounding {
        /// Mapped note before the pattern offset, for change detection.
        mapped_note: u8,
        since: f64,
    },
}

#[derive(Debug, Clone)]
pub struct Arpeggiator {
    config: ArpConfig,
    state: ArpState,
    pattern_index: usize,
}

impl Arpeggiator {
    pub fn new(mut config: ArpConfig) -> Self {
        config.bpm = config.bpm.clamp(MIN_BPM, MAX_BPM);
        if config.pattern.is_empty() {
            config.pattern.push(0);
        }
        Self {
            config,
            state: ArpState::Idle,
            pattern_index: 0,
        }
    }

    /// One beat in seconds.
    pub fn beat_duration(&self) -> f64 {
        60.0 / self.config.bpm as f64
    }

    /// Length of each synthesized note.
    pub fn note_duration(&self) -> f32 {
        (self.beat_duration() as f32) * self.config.note_overlap.max(1.0)
    }

    /// Evaluate the trigger policy at `now`.
    ///
    /// `hand` is the melody hand's signals, `None` when it's absent or outside
    /// its zone.
    pub fn tick(&mut self, hand: Option<&HandSignals>, now: f64) -> TriggerResult {
        let Some(hand) = hand else {
            return match self.state {
                ArpState::Idle => TriggerResult::None,
                ArpState::Sounding { .. } => {
                    self.state = ArpState::Idle;
                    self.pattern_index = 0;
                    TriggerResult::NoteReleased { time: now }
                }
            };
        };

        let mapped = map_note(hand.height, &self.config);
        let due = match self.state {
            ArpState::Idle => true,
            ArpState::Sounding { mapped_note, since } => {
                let elapsed = now - since;
                let moved = mapped.abs_diff(mapped_note) >= self.config.note_change_threshold.max(1);
                elapsed >= self.beat_duration()
                    || (moved && elapsed >= self.config.min_retrigger as f64)
            }
        };
        if !due {
            return TriggerResult::None;
        }

        let offset = self.config.pattern[self.pattern_index];
        self.pattern_index = (self.pattern_index + 1) % self.config.pattern.len();
        let pitch = mapping::clamp_note(mapped as i32 + offset as i32);

        self.state = ArpState::Sounding {
            mapped_note: mapped,
            since: now,
        };

        TriggerResult::NoteTriggered(NoteEvent {
            pitch,
            frequency: midi_note_to_freq(pitch),
            volume: map_volume(hand.pinch, &self.config),
            duration: self.note_duration(),
            time: now,
        })
    }

    pub fn state(&self) -> ArpState {
        self.state
    }

    pub fn is_sounding(&self) -> bool {
        matches!(self.state, ArpState::Sounding { .. })
    }

    pub fn bpm(&self) -> f32 {
        self.config.bpm
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        self.config.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
    }

    /// Replace the offset pattern and restart it. An empty pattern plays the
    /// mapped note unchanged.
    pub fn set_pattern(&mut self, pattern: Vec<i8>) {
        self.config.pattern = if pattern.is_empty() { vec![0] } else { pattern };
        self.pattern_index = 0;
    }

    pub fn config(&self) -> &ArpConfig {
        &self.config
    }
}
