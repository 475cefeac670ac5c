//! The closed set of drum instruments and the finger that plays each one.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::gesture::Finger;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    Kick,
    Snare,
    HiHat,
    HighTom,
    Crash,
}

impl Instrument {
    pub const COUNT: usize = 5;

    pub const ALL: [Instrument; Instrument::COUNT] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::HiHat,
        Instrument::HighTom,
        Instrument::Crash,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The finger whose extension enables this instrument.
    pub fn finger(self) -> Finger {
        match self {
            Instrument::Crash => Finger::Thumb,
            Instrument::Kick => Finger::Index,
            Instrument::Snare => Finger::Middle,
            Instrument::HiHat => Finger::Ring,
            Instrument::HighTom => Finger::Pinky,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::Snare => "snare",
            Instrument::HiHat => "hihat",
            Instrument::HighTom => "hightom",
            Instrument::Crash => "crash",
        }
    }

    /// File name looked up in an asset directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Instrument::Kick => "kick.wav",
            Instrument::Snare => "snare.wav",
            Instrument::HiHat => "hihat.wav",
            Instrument::HighTom => "hightom.wav",
            Instrument::Crash => "crashcymbal.wav",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value for every instrument, indexable by [`Instrument`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerInstrument<T>(pub [T; Instrument::COUNT]);

impl<T: Copy> PerInstrument<T> {
    pub fn splat(value: T) -> Self {
        Self([value; Instrument::COUNT])
    }
}

impl<T> std::ops::Index<Instrument> for PerInstrument<T> {
    type Output = T;

    fn index(&self, instrument: Instrument) -> &T {
        &self.0[instrument.index()]
    }
}

impl<T> std::ops::IndexMut<Instrument> for PerInstrument<T> {
    fn index_mut(&mut self, instrument: Instrument) -> &mut T {
        &mut self.0[instrument.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_finger_plays_exactly_one_instrument() {
        for finger in Finger::ALL {
            let n = Instrument::ALL.iter().filter(|i| i.finger() == finger).count();
            assert_eq!(n, 1, "{finger:?}");
        }
    }

    #[test]
    fn index_matches_position_in_all() {
        for (i, inst) in Instrument::ALL.iter().enumerate() {
            assert_eq!(inst.index(), i);
        }
    }
}
