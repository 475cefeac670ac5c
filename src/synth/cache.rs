//! Bounded FIFO cache of synthesized tones.
//!
//! Keys are `(frequency rounded to 0.1 Hz, duration rounded to 1 ms)`. Both
//! lookups and synthesis go through the rounded values, so two requests that
//! share a key always get bit-identical audio. When an insert would exceed the
//! capacity the oldest inserted key goes first; lookups don't refresh an
//! entry's position.

use std::collections::{HashMap, VecDeque};

use super::tone::ToneSynth;
use crate::AudioBuffer;

/// Rounded `(frequency, duration)` pair identifying a cached tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToneKey {
    decihertz: u32,
    millis: u32,
}

impl ToneKey {
    pub fn new(frequency: f32, duration: f32) -> Self {
        Self {
            decihertz: (frequency.max(0.0) * 10.0).round() as u32,
            millis: (duration.max(0.0) * 1_000.0).round() as u32,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.decihertz as f32 / 10.0
    }

    pub fn duration(&self) -> f32 {
        self.millis as f32 / 1_000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug)]
pub struct ToneCache {
    synth: ToneSynth,
    capacity: usize,
    entries: HashMap<ToneKey, AudioBuffer>,
    /// Insertion order, oldest first.
    order: VecDeque<ToneKey>,
    stats: CacheStats,
}

impl ToneCache {
    pub fn new(synth: ToneSynth, capacity: usize) -> Self {
        Self {
            synth,
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Return the cached tone for `(frequency, duration)`, synthesizing and
    /// inserting it on a miss.
    pub fn get_or_synthesize(&mut self, frequency: f32, duration: f32) -> AudioBuffer {
        let key = ToneKey::new(frequency, duration);
        if let Some(buffer) = self.entries.get(&key) {
            self.stats.hits += 1;
            return buffer.clone();
        }

        self.stats.misses += 1;
        let buffer = self.synth.synthesize(key.frequency(), key.duration());
        if self.capacity == 0 {
            return buffer;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    self.stats.evictions += 1;
                }
                None => break,
            }
        }

        self.entries.insert(key, buffer.clone());
        self.order.push_back(key);
        buffer
    }

    pub fn contains(&self, frequency: f32, duration: f32) -> bool {
        self.entries.contains_key(&ToneKey::new(frequency, duration))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn synth(&self) -> &ToneSynth {
        &self.synth
    }
}
