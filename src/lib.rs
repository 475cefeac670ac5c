pub mod arp; // Melody hand: pitch and volume from height and pinch
pub mod config;
pub mod dsp;
pub mod engine; // Channel pool, lead voice, audio context
pub mod error;
pub mod gesture; // Landmarks in, smoothed control signals out
pub mod io;
pub mod runtime;
pub mod sequencing; // Drum patterns, swung clock, step sequencer
pub mod synth; // Tone synthesis and cache
pub mod trigger;
pub mod voices;

use std::sync::Arc;

pub use config::Config;
pub use error::EngineError;

/// Mono audio shared between the cache, sample bank and channels.
pub type AudioBuffer = Arc<[f32]>;

pub const MAX_BLOCK_SIZE: usize = 2048;
