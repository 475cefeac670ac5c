//! Engine configuration.
//!
//! Each component has its own config struct with the defaults the instrument
//! was tuned with; [`Config`] gathers them. With the `serde` feature a whole
//! config can be read from TOML, and any field left out keeps its default:
//!
//! ```toml
//! melody_hand = "left"
//! master_gain = 0.6
//!
//! [sequencer]
//! bpm = 96
//! swing = 0.1
//!
//! [arp]
//! pattern = [0, 4, 7]
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    arp::ArpConfig,
    engine::{ChannelConfig, DEFAULT_MASTER_GAIN},
    gesture::{GestureConfig, Hand},
    io::SampleSource,
    sequencing::{SequencerConfig, TempoConfig},
    synth::ToneConfig,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The hand that plays the arpeggiator; the other one drums.
    pub melody_hand: Hand,
    pub master_gain: f32,
    /// Scheduler poll interval in milliseconds.
    pub tick_ms: u64,
    /// Capacity of the trigger event queue.
    pub event_queue: usize,
    pub samples: SampleSource,
    pub gesture: GestureConfig,
    pub tone: ToneConfig,
    pub arp: ArpConfig,
    pub sequencer: SequencerConfig,
    pub tempo: TempoConfig,
    pub channels: ChannelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            melody_hand: Hand::Left,
            master_gain: DEFAULT_MASTER_GAIN,
            tick_ms: 2,
            event_queue: 256,
            samples: SampleSource::default(),
            gesture: GestureConfig::default(),
            tone: ToneConfig::default(),
            arp: ArpConfig::default(),
            sequencer: SequencerConfig::default(),
            tempo: TempoConfig::default(),
            channels: ChannelConfig::default(),
        }
    }
}

impl Config {
    pub fn drum_hand(&self) -> Hand {
        match self.melody_hand {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    /// Parse a TOML document; missing fields fall back to defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, crate::EngineError> {
        toml::from_str(s).map_err(|e| crate::EngineError::Config(e.to_string()))
    }
}
