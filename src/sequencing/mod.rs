//! Drum sequencing: instruments, pattern sets, the swung step clock and the
//! finger-gated drum machine that ties them together.

pub mod clock;
pub mod drum_machine;
pub mod instrument;
pub mod pattern;
pub mod tempo;

pub use clock::{SequencerClock, MAX_BPM, MAX_SWING, MIN_BPM};
pub use drum_machine::{SequencerConfig, StepSequencer};
pub use instrument::{Instrument, PerInstrument};
pub use pattern::{builtin_sets, Lane, PatternBank, PatternSet, STEPS};
pub use tempo::{TempoConfig, TempoGesture};
