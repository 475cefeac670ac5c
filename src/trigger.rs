//! Tagged results of the per-tick state transitions.
//!
//! The arpeggiator and the step sequencer never touch audio directly. Their
//! `tick` functions return these values and the engine turns them into
//! playback, which keeps both state machines testable without timers or an
//! output device.
//!
//! [`TriggerEvent`]s are what the engine reports outward once it has acted on
//! a result. They are for display only and never feed back into control.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencing::Instrument;

/// A note chosen by the arpeggiator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// MIDI note number.
    pub pitch: u8,
    pub frequency: f32,
    /// 0..1, before master gain.
    pub volume: f32,
    /// Length of the tone to synthesize, in seconds.
    pub duration: f32,
    pub time: f64,
}

/// One instrument firing on one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumHit {
    pub instrument: Instrument,
    pub step: usize,
    /// Pattern velocity, 0..1.
    pub velocity: f32,
    /// Per-instrument mix volume, 0..1.
    pub volume: f32,
}

impl DrumHit {
    /// Gain that reaches the output, clamped to `[0, 1]`.
    pub fn gain(&self, master_gain: f32) -> f32 {
        (self.velocity * self.volume * master_gain).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerResult {
    /// Nothing to do this tick.
    None,
    NoteTriggered(NoteEvent),
    /// The controlling hand went away; fade the sounding note out.
    NoteReleased { time: f64 },
    /// A step fired. `hits` may be empty when no enabled instrument has a
    /// velocity on that step.
    DrumStep { step: usize, hits: Vec<DrumHit>, time: f64 },
    PatternChanged { index: usize },
}

/// Which sound a [`TriggerEvent`] belongs to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceName {
    Lead,
    Drum(Instrument),
}

impl fmt::Display for VoiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceName::Lead => f.write_str("lead"),
            VoiceName::Drum(inst) => write!(f, "{inst}"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerEvent {
    pub voice: VoiceName,
    /// Pattern velocity for drums, mapped volume for the lead.
    pub velocity: f32,
    /// Gain handed to the channel pool, after master gain and clamping.
    pub gain: f32,
    /// Sequencer step, `None` for lead notes.
    pub step: Option<usize>,
    pub timestamp: f64,
    /// False when the hit was decided but made no sound (no sample, or no
    /// free channel).
    pub played: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drum_gain_multiplies_and_clamps() {
        let hit = DrumHit {
            instrument: Instrument::Kick,
            step: 0,
            velocity: 1.0,
            volume: 0.85,
        };
        assert!((hit.gain(0.3) - 0.255).abs() < 1e-6);
        assert_eq!(hit.gain(2.0), 1.0);
        assert_eq!(hit.gain(-1.0), 0.0);
    }

    #[test]
    fn voice_names_read_like_instruments() {
        assert_eq!(VoiceName::Lead.to_string(), "lead");
        assert_eq!(VoiceName::Drum(Instrument::HiHat).to_string(), "hihat");
    }
}
