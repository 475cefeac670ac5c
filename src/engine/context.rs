//! The audio side of the engine, owned in one place.
//!
//! [`AudioEngineContext`] holds everything that turns a decided note or drum
//! hit into sound: the shared mixer the output callback reads from, the tone
//! cache, the instrument samples, the lead voice and the master gain. Control
//! code is handed a `&mut` to it; nothing here is global.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{
    channels::{ChannelConfig, ChannelHandle, ChannelPool},
    voice::MonoVoice,
};
use crate::{
    io::SampleBank,
    synth::{ToneCache, ToneConfig, ToneSynth},
    trigger::{DrumHit, NoteEvent},
};

/// Channel pool shared between the control thread and the output callback.
pub type SharedMixer = Arc<Mutex<ChannelPool>>;

/// Lock the mixer, recovering from a poisoned lock: a panic elsewhere must
/// not silence the output.
pub fn lock_mixer(mixer: &SharedMixer) -> MutexGuard<'_, ChannelPool> {
    mixer.lock().unwrap_or_else(PoisonError::into_inner)
}

pub const DEFAULT_MASTER_GAIN: f32 = 0.8;

pub struct AudioEngineContext {
    mixer: SharedMixer,
    tones: ToneCache,
    samples: SampleBank,
    lead: MonoVoice,
    master_gain: f32,
    crossfade: f32,
    release_fade: f32,
}

impl AudioEngineContext {
    pub fn new(
        sample_rate: f32,
        tone_config: &ToneConfig,
        channel_config: &ChannelConfig,
        samples: SampleBank,
    ) -> Self {
        let synth = ToneSynth::new(sample_rate, tone_config);
        Self {
            mixer: Arc::new(Mutex::new(ChannelPool::new(sample_rate, channel_config))),
            tones: ToneCache::new(synth, tone_config.cache_capacity),
            samples,
            lead: MonoVoice::new(),
            master_gain: DEFAULT_MASTER_GAIN,
            crossfade: channel_config.crossfade.max(0.0),
            release_fade: channel_config.release_fade.max(0.0),
        }
    }

    /// A handle to the mixer for the output callback.
    pub fn mixer(&self) -> SharedMixer {
        Arc::clone(&self.mixer)
    }

    /// Gain a lead note plays at.
    pub fn note_gain(&self, note: &NoteEvent) -> f32 {
        (note.volume * self.master_gain).clamp(0.0, 1.0)
    }

    /// Synthesize (or fetch) the note's tone and crossfade it in on the lead.
    pub fn play_note(&mut self, note: &NoteEvent) -> Option<ChannelHandle> {
        let buffer = self.tones.get_or_synthesize(note.frequency, note.duration);
        let gain = self.note_gain(note);
        let mut pool = lock_mixer(&self.mixer);
        self.lead.retrigger(&mut pool, buffer, gain, self.crossfade)
    }

    /// Fade the lead out over the release window.
    pub fn release_note(&mut self) -> bool {
        let mut pool = lock_mixer(&self.mixer);
        self.lead.release(&mut pool, self.release_fade)
    }

    /// Play the instrument sample for `hit`. Silent when the instrument has
    /// no sample or the pool is full.
    pub fn play_drum(&mut self, hit: &DrumHit) -> Option<ChannelHandle> {
        let buffer = self.samples.get(hit.instrument)?;
        let gain = hit.gain(self.master_gain);
        lock_mixer(&self.mixer).play(buffer, gain)
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain.clamp(0.0, 1.0);
    }

    pub fn tones(&self) -> &ToneCache {
        &self.tones
    }

    pub fn samples(&self) -> &SampleBank {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut SampleBank {
        &mut self.samples
    }

    /// Stop every channel at once.
    pub fn silence(&mut self) {
        lock_mixer(&self.mixer).stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::Instrument;

    fn context(samples: SampleBank) -> AudioEngineContext {
        AudioEngineContext::new(8_000.0, &ToneConfig::default(), &ChannelConfig::default(), samples)
    }

    fn note(frequency: f32) -> NoteEvent {
        NoteEvent {
            pitch: 57,
            frequency,
            volume: 0.5,
            duration: 0.1,
            time: 0.0,
        }
    }

    #[test]
    fn drum_gain_reaches_the_pool() {
        let mut ctx = context(SampleBank::synthesized(8_000.0));
        ctx.set_master_gain(0.3);
        let hit = DrumHit {
            instrument: Instrument::Kick,
            step: 0,
            velocity: 1.0,
            volume: 0.85,
        };
        let handle = ctx.play_drum(&hit).unwrap();
        let gain = lock_mixer(&ctx.mixer()).gain(handle).unwrap();
        assert!((gain - 0.255).abs() < 1e-6);
    }

    #[test]
    fn missing_sample_is_silent() {
        let mut ctx = context(SampleBank::empty(8_000.0));
        let hit = DrumHit {
            instrument: Instrument::Snare,
            step: 4,
            velocity: 1.0,
            volume: 1.0,
        };
        assert!(ctx.play_drum(&hit).is_none());
        assert!(ctx.play_drum(&hit).is_none());
        assert_eq!(lock_mixer(&ctx.mixer()).active_count(), 0);
    }

    #[test]
    fn repeated_notes_reuse_cached_tone() {
        let mut ctx = context(SampleBank::empty(8_000.0));
        ctx.play_note(&note(220.0));
        ctx.play_note(&note(220.0));
        assert_eq!(ctx.tones().len(), 1);
        assert_eq!(ctx.tones().stats().hits, 1);
        // old note crossfading, new note playing
        assert_eq!(lock_mixer(&ctx.mixer()).active_count(), 2);
    }

    #[test]
    fn master_gain_is_clamped() {
        let mut ctx = context(SampleBank::empty(8_000.0));
        ctx.set_master_gain(1.7);
        assert_eq!(ctx.master_gain(), 1.0);
        assert_eq!(ctx.note_gain(&note(220.0)), 0.5);
    }
}
