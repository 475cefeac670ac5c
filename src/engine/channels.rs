//! Fixed-size pool of playback channels.
//!
//! A channel plays one buffer once at a fixed gain, optionally under a fade
//! that ramps it down to silence. Nothing here allocates after construction:
//! `play` claims a free slot or gives up, and `render` mixes every live
//! channel into the output block.
//!
//! ```text
//!   play ──▶ Playing ──fade_out──▶ Fading ──ramp done──▶ Free
//!               │                     │
//!               └──── buffer end ─────┴────────────────▶ Free
//!               └──── stop / retention cap ────────────▶ Free
//! ```
//!
//! Handles carry a generation number so a handle to a channel that has since
//! been reused for another sound is simply stale: fading or stopping it does
//! nothing.

use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{dsp::envelope::Fade, AudioBuffer};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    /// Voices expected to sound at once; the pool holds twice this many
    /// channels so crossfades can overlap.
    pub polyphony: usize,
    /// How many of the most recently started channels are kept. Starting one
    /// more force-stops the oldest.
    pub retention: usize,
    /// Fade applied to the previous lead note when a new one starts, seconds.
    pub crossfade: f32,
    /// Fade applied to the lead note when its hand disappears, seconds.
    pub release_fade: f32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            polyphony: 8,
            retention: 12,
            crossfade: 0.03,
            release_fade: 0.15,
        }
    }
}

impl ChannelConfig {
    pub fn pool_size(&self) -> usize {
        self.polyphony.max(1) * 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelHandle {
    index: usize,
    generation: u64,
}

impl ChannelHandle {
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Free,
    Playing,
    Fading,
}

#[derive(Debug, Clone, Default)]
struct Channel {
    buffer: Option<AudioBuffer>,
    position: usize,
    gain: f32,
    fade: Option<Fade>,
    generation: u64,
}

impl Channel {
    fn state(&self) -> ChannelState {
        match (&self.buffer, &self.fade) {
            (None, _) => ChannelState::Free,
            (Some(_), None) => ChannelState::Playing,
            (Some(_), Some(_)) => ChannelState::Fading,
        }
    }

    fn is_free(&self) -> bool {
        self.buffer.is_none()
    }

    fn owns(&self, handle: ChannelHandle) -> bool {
        !self.is_free() && self.generation == handle.generation
    }

    fn free(&mut self) {
        self.buffer = None;
        self.fade = None;
        self.position = 0;
    }

    /// Mix into `out`; returns false once the channel has finished.
    fn render(&mut self, out: &mut [f32]) -> bool {
        let Some(buffer) = &self.buffer else {
            return false;
        };
        for o in out.iter_mut() {
            if self.position >= buffer.len() {
                break;
            }
            let fade_gain = match &mut self.fade {
                Some(fade) if fade.is_finished() => break,
                Some(fade) => fade.next_gain(),
                None => 1.0,
            };
            *o += buffer[self.position] * self.gain * fade_gain;
            self.position += 1;
        }
        let done = self.position >= buffer.len() || self.fade.is_some_and(|f| f.is_finished());
        if done {
            self.free();
        }
        !done
    }
}

/// Counters for observing pool pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelStats {
    pub started: u64,
    /// Requests refused because every channel was busy.
    pub dropped: u64,
    /// Channels stopped early by the retention cap.
    pub evicted: u64,
}

#[derive(Debug)]
pub struct ChannelPool {
    channels: Vec<Channel>,
    recent: VecDeque<ChannelHandle>,
    retention: usize,
    sample_rate: f32,
    next_generation: u64,
    stats: ChannelStats,
}

impl ChannelPool {
    pub fn new(sample_rate: f32, config: &ChannelConfig) -> Self {
        let size = config.pool_size();
        Self {
            channels: vec![Channel::default(); size],
            recent: VecDeque::with_capacity(size),
            retention: config.retention.max(1),
            sample_rate,
            next_generation: 1,
            stats: ChannelStats::default(),
        }
    }

    /// Start `buffer` at `gain` (clamped to `[0, 1]`).
    ///
    /// Returns `None` and drops the request when every channel is busy.
    pub fn play(&mut self, buffer: AudioBuffer, gain: f32) -> Option<ChannelHandle> {
        let Some(index) = self.channels.iter().position(Channel::is_free) else {
            self.stats.dropped += 1;
            debug!(pool = self.channels.len(), "no free channel, dropping playback request");
            return None;
        };

        let generation = self.next_generation;
        self.next_generation += 1;
        self.channels[index] = Channel {
            buffer: Some(buffer),
            position: 0,
            gain: gain.clamp(0.0, 1.0),
            fade: None,
            generation,
        };
        self.stats.started += 1;

        let handle = ChannelHandle { index, generation };
        self.track(handle);
        Some(handle)
    }

    fn track(&mut self, handle: ChannelHandle) {
        let channels = &self.channels;
        self.recent.retain(|h| channels[h.index].owns(*h));
        self.recent.push_back(handle);
        while self.recent.len() > self.retention {
            if let Some(oldest) = self.recent.pop_front() {
                if self.stop(oldest) {
                    self.stats.evicted += 1;
                }
            }
        }
    }

    /// Ramp `handle` down to silence over `seconds`, from its current level.
    ///
    /// Fading an already fading channel restarts the ramp from where it is.
    /// Returns false for stale handles.
    pub fn fade_out(&mut self, handle: ChannelHandle, seconds: f32) -> bool {
        let sample_rate = self.sample_rate;
        let Some(channel) = self.channel_mut(handle) else {
            return false;
        };
        if seconds <= 0.0 {
            channel.free();
            return true;
        }
        let level = channel.fade.map_or(1.0, |f| f.level());
        channel.fade = Some(Fade::new(level, seconds, sample_rate));
        true
    }

    /// Stop `handle` immediately. Returns false for stale handles.
    pub fn stop(&mut self, handle: ChannelHandle) -> bool {
        match self.channel_mut(handle) {
            Some(channel) => {
                channel.free();
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&mut self) {
        for channel in &mut self.channels {
            channel.free();
        }
        self.recent.clear();
    }

    /// Mix every live channel into `out`, overwriting it. The mix is clamped to
    /// `[-1, 1]`.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        for channel in &mut self.channels {
            if !channel.is_free() {
                channel.render(out);
            }
        }
        for s in out.iter_mut() {
            *s = s.clamp(-1.0, 1.0);
        }
    }

    pub fn state(&self, handle: ChannelHandle) -> ChannelState {
        match self.channels.get(handle.index) {
            Some(channel) if channel.owns(handle) => channel.state(),
            _ => ChannelState::Free,
        }
    }

    pub fn is_active(&self, handle: ChannelHandle) -> bool {
        self.state(handle) != ChannelState::Free
    }

    /// Gain `handle` was started with, if it's still live.
    pub fn gain(&self, handle: ChannelHandle) -> Option<f32> {
        self.channels
            .get(handle.index)
            .filter(|c| c.owns(handle))
            .map(|c| c.gain)
    }

    pub fn active_count(&self) -> usize {
        self.channels.iter().filter(|c| !c.is_free()).count()
    }

    pub fn capacity(&self) -> usize {
        self.channels.len()
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn channel_mut(&mut self, handle: ChannelHandle) -> Option<&mut Channel> {
        self.channels
            .get_mut(handle.index)
            .filter(|c| c.owns(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones(len: usize) -> AudioBuffer {
        vec![1.0; len].into()
    }

    fn pool(polyphony: usize, retention: usize) -> ChannelPool {
        ChannelPool::new(
            1_000.0,
            &ChannelConfig {
                polyphony,
                retention,
                ..ChannelConfig::default()
            },
        )
    }

    #[test]
    fn pool_is_twice_polyphony() {
        assert_eq!(pool(8, 12).capacity(), 16);
    }

    #[test]
    fn play_mixes_at_gain_until_buffer_ends() {
        let mut p = pool(1, 4);
        let h = p.play(ones(3), 0.5).unwrap();
        let mut out = [0.0; 5];
        p.render(&mut out);
        assert_eq!(out, [0.5, 0.5, 0.5, 0.0, 0.0]);
        assert!(!p.is_active(h));
    }

    #[test]
    fn gain_is_clamped() {
        let mut p = pool(1, 4);
        let h = p.play(ones(10), 3.0).unwrap();
        assert_eq!(p.gain(h), Some(1.0));
    }

    #[test]
    fn full_pool_drops_without_evicting() {
        let mut p = pool(1, 4);
        let a = p.play(ones(100), 1.0).unwrap();
        let b = p.play(ones(100), 1.0).unwrap();
        assert!(p.play(ones(100), 1.0).is_none());
        assert!(p.is_active(a) && p.is_active(b));
        assert_eq!(p.stats().dropped, 1);
    }

    #[test]
    fn retention_cap_stops_oldest() {
        let mut p = pool(4, 2);
        let a = p.play(ones(100), 1.0).unwrap();
        let b = p.play(ones(100), 1.0).unwrap();
        let c = p.play(ones(100), 1.0).unwrap();
        assert!(!p.is_active(a));
        assert!(p.is_active(b) && p.is_active(c));
        assert_eq!(p.stats().evicted, 1);
    }

    #[test]
    fn fade_ramps_to_silence_and_frees() {
        let mut p = pool(1, 4);
        let h = p.play(ones(1_000), 1.0).unwrap();
        assert!(p.fade_out(h, 0.004));
        assert_eq!(p.state(h), ChannelState::Fading);

        let mut out = [0.0; 6];
        p.render(&mut out);
        assert_eq!(out[0], 1.0);
        assert!(out[1] < out[0] && out[2] < out[1] && out[3] < out[2]);
        assert_eq!(&out[4..], &[0.0, 0.0]);
        assert!(!p.is_active(h));
    }

    #[test]
    fn stale_handle_does_nothing() {
        let mut p = pool(1, 4);
        let old = p.play(ones(1), 1.0).unwrap();
        let mut out = [0.0; 2];
        p.render(&mut out);

        let new = p.play(ones(100), 1.0).unwrap();
        assert_eq!(new.index(), old.index());
        assert!(!p.stop(old));
        assert!(!p.fade_out(old, 0.1));
        assert!(p.is_active(new));
    }

    #[test]
    fn mix_is_clamped() {
        let mut p = pool(4, 8);
        for _ in 0..3 {
            p.play(ones(4), 0.8);
        }
        let mut out = [0.0; 4];
        p.render(&mut out);
        assert!(out.iter().all(|&s| s == 1.0));
    }
}
