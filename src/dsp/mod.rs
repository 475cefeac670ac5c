//! Low-level DSP primitives used by the synthesizer and the channel pool.
//!
//! These stay focused on the signal math: rendering partials, shaping
//! amplitude. Caching, scheduling and playback live a layer above.

/// Attack/release tone envelope and live fade ramps.
pub mod envelope;
/// Harmonic oscillator and peak normalization.
pub mod oscillator;

pub use envelope::{EnvelopeCurve, Fade, ToneEnvelope};
pub use oscillator::{Partial, DEFAULT_PARTIALS};
