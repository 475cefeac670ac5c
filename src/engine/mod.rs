//! Voice and channel management.

pub mod channels;
pub mod context;
pub mod voice;

pub use channels::{ChannelConfig, ChannelHandle, ChannelPool, ChannelState, ChannelStats};
pub use context::{lock_mixer, AudioEngineContext, SharedMixer, DEFAULT_MASTER_GAIN};
pub use voice::MonoVoice;
