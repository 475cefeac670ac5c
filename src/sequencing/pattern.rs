//! 16-step velocity patterns.
//!
//! A [`PatternSet`] is a complete arrangement: for every instrument, sixteen
//! optional velocities. `None` means "no hit on this step", which is distinct
//! from a hit at velocity 0. A [`PatternBank`] holds several sets and tracks
//! which one is current; there is always exactly one.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::instrument::Instrument;

pub const STEPS: usize = 16;

/// Sixteen optional velocities for one instrument.
pub type Lane = [Option<f32>; STEPS];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSet {
    pub name: String,
    lanes: [Lane; Instrument::COUNT],
}

impl PatternSet {
    /// An empty set with no hits anywhere.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lanes: [[None; STEPS]; Instrument::COUNT],
        }
    }

    /// Set `velocity` for each listed step of `instrument`.
    pub fn hits(mut self, instrument: Instrument, hits: &[(usize, f32)]) -> Self {
        for &(step, velocity) in hits {
            if step < STEPS {
                self.lanes[instrument.index()][step] = Some(velocity.clamp(0.0, 1.0));
            }
        }
        self
    }

    /// A hit on every step of `instrument` at the same velocity.
    pub fn every_step(mut self, instrument: Instrument, velocity: f32) -> Self {
        self.lanes[instrument.index()] = [Some(velocity.clamp(0.0, 1.0)); STEPS];
        self
    }

    /// Velocity for `instrument` at `step`, if the pattern has a hit there.
    pub fn velocity(&self, instrument: Instrument, step: usize) -> Option<f32> {
        self.lanes[instrument.index()][step % STEPS]
    }

    pub fn lane(&self, instrument: Instrument) -> &Lane {
        &self.lanes[instrument.index()]
    }
}

/// The seven pattern sets the performance starts with.
pub fn builtin_sets() -> Vec<PatternSet> {
    use Instrument::*;

    vec![
        PatternSet::new("Pop Groove")
            .hits(Kick, &[(0, 1.0), (4, 0.6), (8, 0.9), (12, 0.5)])
            .hits(Snare, &[(5, 1.0), (13, 1.0)])
            .every_step(HiHat, 0.45)
            .hits(Crash, &[(0, 0.8)]),
        PatternSet::new("Dark Trap")
            .hits(Kick, &[(0, 1.0), (3, 0.7), (7, 0.9), (10, 0.55)])
            .hits(Snare, &[(4, 1.0), (12, 1.0)])
            .hits(HiHat, &[(2, 0.5), (6, 0.5), (10, 0.5), (14, 0.5)])
            .hits(HighTom, &[(15, 0.4)]),
        PatternSet::new("Minimal Trap")
            .hits(Kick, &[(0, 1.0), (8, 0.6)])
            .hits(Snare, &[(4, 0.9), (12, 0.9)])
            .hits(
                HiHat,
                &[(1, 0.35), (2, 0.55), (4, 0.35), (7, 0.6), (9, 0.55), (12, 0.35), (15, 0.6)],
            )
            .hits(Crash, &[(0, 0.9)]),
        PatternSet::new("Breakbeat")
            .hits(Kick, &[(0, 1.0), (6, 0.8)])
            .hits(Snare, &[(4, 1.0), (12, 1.0)])
            .every_step(HiHat, 0.35)
            .hits(HiHat, &[(2, 0.55), (10, 0.55)])
            .hits(HighTom, &[(7, 0.4), (15, 0.4)])
            .hits(Crash, &[(0, 0.9)]),
        PatternSet::new("Bounce")
            .hits(Kick, &[(0, 1.0), (2, 0.8), (4, 1.0), (6, 0.8), (8, 1.0), (10, 0.8)])
            .hits(Snare, &[(4, 0.9), (12, 0.9)])
            .hits(HiHat, &[(2, 0.5), (6, 0.5), (10, 0.5), (14, 0.5)])
            .hits(Crash, &[(0, 0.75)]),
        PatternSet::new("Percussive")
            .hits(Kick, &[(0, 1.0), (3, 0.9), (7, 0.75), (11, 0.8)])
            .hits(Snare, &[(5, 1.0), (13, 1.0)])
            .every_step(HiHat, 0.3)
            .hits(HighTom, &[(9, 0.5)]),
        PatternSet::new("Dance")
            .hits(Kick, &[(0, 1.0), (4, 1.0), (8, 1.0), (12, 1.0)])
            .hits(Snare, &[(4, 1.0), (12, 1.0)])
            .hits(HiHat, &[(2, 0.5), (6, 0.5), (10, 0.5), (14, 0.5), (15, 0.7)])
            .hits(HighTom, &[(7, 0.5)])
            .hits(Crash, &[(0, 1.0)]),
    ]
}

/// Several pattern sets with exactly one selected.
#[derive(Debug, Clone)]
pub struct PatternBank {
    sets: Vec<PatternSet>,
    current: usize,
}

impl PatternBank {
    /// Returns `None` for an empty list: a bank always has a current set.
    pub fn new(sets: Vec<PatternSet>) -> Option<Self> {
        if sets.is_empty() {
            None
        } else {
            Some(Self { sets, current: 0 })
        }
    }

    pub fn current(&self) -> &PatternSet {
        &self.sets[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Select the next set, wrapping around. Returns the new index.
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % self.sets.len();
        self.current
    }

    /// Select set `index`. Out-of-range indices are rejected.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.sets.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn sets(&self) -> &[PatternSet] {
        &self.sets
    }
}

impl Default for PatternBank {
    fn default() -> Self {
        Self {
            sets: builtin_sets(),
            current: 0,
        }
    }
}
