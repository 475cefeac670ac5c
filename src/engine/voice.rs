//! Monophonic voice on top of the channel pool.
//!
//! The lead only ever has one note it considers "current". Starting a new
//! note fades the previous one out over the crossfade window instead of
//! cutting it, so for a few milliseconds both channels sound.

use super::channels::{ChannelHandle, ChannelPool};
use crate::AudioBuffer;

#[derive(Debug, Clone, Default)]
pub struct MonoVoice {
    current: Option<ChannelHandle>,
}

impl MonoVoice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `buffer`, crossfading out whatever was playing.
    ///
    /// If the pool is full the new note is dropped, but the old one still
    /// fades out so the voice doesn't hang on a stale pitch.
    pub fn retrigger(
        &mut self,
        pool: &mut ChannelPool,
        buffer: AudioBuffer,
        gain: f32,
        crossfade: f32,
    ) -> Option<ChannelHandle> {
        let previous = self.current.take();
        let handle = pool.play(buffer, gain);
        if let Some(prev) = previous {
            pool.fade_out(prev, crossfade);
        }
        self.current = handle;
        handle
    }

    /// Fade the current note out over `fade` seconds.
    pub fn release(&mut self, pool: &mut ChannelPool, fade: f32) -> bool {
        match self.current.take() {
            Some(handle) => pool.fade_out(handle, fade),
            None => false,
        }
    }

    /// The channel of the current note, if it is still sounding.
    pub fn current(&self, pool: &ChannelPool) -> Option<ChannelHandle> {
        self.current.filter(|&h| pool.is_active(h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::channels::{ChannelConfig, ChannelState};

    fn pool() -> ChannelPool {
        ChannelPool::new(1_000.0, &ChannelConfig::default())
    }

    fn buffer() -> AudioBuffer {
        vec![0.5; 1_000].into()
    }

    #[test]
    fn retrigger_crossfades_previous_note() {
        let mut pool = pool();
        let mut voice = MonoVoice::new();
        let first = voice.retrigger(&mut pool, buffer(), 1.0, 0.03).unwrap();
        let second = voice.retrigger(&mut pool, buffer(), 1.0, 0.03).unwrap();

        assert_eq!(pool.state(first), ChannelState::Fading);
        assert_eq!(pool.state(second), ChannelState::Playing);
        assert_eq!(voice.current(&pool), Some(second));

        // after the 30 ms crossfade only the new note remains
        let mut out = vec![0.0; 40];
        pool.render(&mut out);
        assert!(!pool.is_active(first));
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn release_fades_and_forgets() {
        let mut pool = pool();
        let mut voice = MonoVoice::new();
        let h = voice.retrigger(&mut pool, buffer(), 1.0, 0.03).unwrap();
        assert!(voice.release(&mut pool, 0.15));
        assert_eq!(pool.state(h), ChannelState::Fading);
        assert!(voice.current(&pool).is_none());
        assert!(!voice.release(&mut pool, 0.15));
    }
}
