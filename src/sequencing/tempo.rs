//! Pinch-lock tempo gesture.
//!
//! While the drum hand pinches (thumb and index tips nearly touching) its
//! height sets the tempo: bottom of the frame is `min_bpm`, top is `max_bpm`.
//! Releasing the pinch leaves the last tempo in place, and the next pinch
//! applies its height again even if it lands on the same tempo.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::clock::{MAX_BPM, MIN_BPM};
use crate::gesture::HandSignals;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct TempoConfig {
    pub enabled: bool,
    /// Pinch distance below which the tempo is locked to hand height.
    pub pinch_threshold: f32,
    pub min_bpm: f32,
    pub max_bpm: f32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pinch_threshold: 0.03,
            min_bpm: 60.0,
            max_bpm: 180.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TempoGesture {
    config: TempoConfig,
    locked: bool,
    last_bpm: Option<f32>,
}

impl TempoGesture {
    pub fn new(config: TempoConfig) -> Self {
        Self {
            config,
            locked: false,
            last_bpm: None,
        }
    }

    /// Height in 0..1 to a whole BPM within the configured range.
    pub fn map_height(&self, height: f32) -> f32 {
        let h = height.clamp(0.0, 1.0);
        let bpm = self.config.min_bpm + h * (self.config.max_bpm - self.config.min_bpm);
        bpm.round().clamp(MIN_BPM, MAX_BPM)
    }

    /// Returns the new tempo when it changes this tick.
    pub fn update(&mut self, hand: Option<&HandSignals>) -> Option<f32> {
        let pinched = self.config.enabled
            && hand.is_some_and(|h| h.pinch < self.config.pinch_threshold);
        self.locked = pinched;
        let Some(hand) = hand.filter(|_| pinched) else {
            self.last_bpm = None;
            return None;
        };

        let bpm = self.map_height(hand.height);
        if self.last_bpm == Some(bpm) {
            return None;
        }
        self.last_bpm = Some(bpm);
        Some(bpm)
    }

    /// Forget the last reported tempo, e.g. after it was set from elsewhere.
    pub fn reset(&mut self) {
        self.last_bpm = None;
    }

    /// Whether the pinch is currently held.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn config(&self) -> &TempoConfig {
        &self.config
    }
}
