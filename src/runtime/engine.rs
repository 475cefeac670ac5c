//! One tick of the whole instrument.
//!
//! [`Engine`] wires the pieces together: pose frames go into the gesture
//! processor, and on every scheduler tick the tempo gesture, the arpeggiator
//! and the step sequencer read the latest signals, decide what to play, and
//! the audio context plays it. Each played (or deliberately skipped) sound is
//! reported as a [`TriggerEvent`].
//!
//! The engine has no clock of its own: callers pass `now` in seconds. Tests
//! drive it with made-up timestamps; the [`super::Runtime`] passes elapsed
//! wall-clock time.

use tracing::{debug, info, warn};

use crate::{
    arp::Arpeggiator,
    config::Config,
    engine::{AudioEngineContext, SharedMixer},
    gesture::{GestureProcessor, Hand, HandSignals, PoseFrame},
    io::SampleBank,
    sequencing::{PatternBank, StepSequencer, TempoGesture},
    trigger::{TriggerEvent, TriggerResult, VoiceName},
};

pub struct Engine {
    gesture: GestureProcessor,
    arp: Arpeggiator,
    sequencer: StepSequencer,
    tempo: TempoGesture,
    audio: AudioEngineContext,
    melody_hand: Hand,
    drum_hand: Hand,
}

impl Engine {
    /// Build an engine, loading drum samples as the config says.
    pub fn new(config: &Config, sample_rate: f32) -> Self {
        let samples = config.samples.load(sample_rate);
        Self::with_samples(config, sample_rate, samples)
    }

    pub fn with_samples(config: &Config, sample_rate: f32, samples: SampleBank) -> Self {
        let mut audio = AudioEngineContext::new(sample_rate, &config.tone, &config.channels, samples);
        audio.set_master_gain(config.master_gain);

        let sequencer = StepSequencer::new(&config.sequencer, PatternBank::default());
        // one tempo for both hands: the sequencer's
        let mut arp = Arpeggiator::new(config.arp.clone());
        arp.set_bpm(sequencer.bpm());

        Self {
            gesture: GestureProcessor::new(config.gesture.clone()),
            arp,
            sequencer,
            tempo: TempoGesture::new(config.tempo.clone()),
            audio,
            melody_hand: config.melody_hand,
            drum_hand: config.drum_hand(),
        }
    }

    /// Feed one pose frame into the gesture processor.
    pub fn ingest(&mut self, frame: &PoseFrame) {
        self.gesture.ingest(frame);
    }

    /// Evaluate everything due at `now` and play it.
    pub fn tick(&mut self, now: f64) -> Vec<TriggerEvent> {
        let melody = self.gesture.active(self.melody_hand).copied();
        let drums = self.gesture.active(self.drum_hand).copied();
        let mut events = Vec::new();

        if let Some(bpm) = self.tempo.update(drums.as_ref()) {
            debug!(bpm, "tempo gesture");
            self.apply_bpm(bpm);
        }

        let note = self.arp.tick(melody.as_ref(), now);
        self.apply(note, &mut events);

        for result in self.sequencer.tick(drums.as_ref(), now) {
            self.apply(result, &mut events);
        }

        events
    }

    fn apply(&mut self, result: TriggerResult, events: &mut Vec<TriggerEvent>) {
        match result {
            TriggerResult::None => {}
            TriggerResult::NoteTriggered(note) => {
                let played = self.audio.play_note(&note).is_some();
                events.push(TriggerEvent {
                    voice: VoiceName::Lead,
                    velocity: note.volume,
                    gain: self.audio.note_gain(&note),
                    step: None,
                    timestamp: note.time,
                    played,
                });
            }
            TriggerResult::NoteReleased { .. } => {
                self.audio.release_note();
            }
            TriggerResult::DrumStep { step, hits, time } => {
                for hit in hits {
                    let played = self.audio.play_drum(&hit).is_some();
                    events.push(TriggerEvent {
                        voice: VoiceName::Drum(hit.instrument),
                        velocity: hit.velocity,
                        gain: hit.gain(self.audio.master_gain()),
                        step: Some(step),
                        timestamp: time,
                        played,
                    });
                }
            }
            TriggerResult::PatternChanged { index } => {
                info!(index, name = %self.pattern_name(), "pattern set changed");
            }
        }
    }

    fn apply_bpm(&mut self, bpm: f32) {
        self.sequencer.set_bpm(bpm);
        self.arp.set_bpm(bpm);
    }

    /// Set the tempo of both the sequencer and the arpeggiator (clamped).
    pub fn set_bpm(&mut self, bpm: f32) {
        self.apply_bpm(bpm);
        self.tempo.reset();
        info!(bpm = self.sequencer.bpm(), "tempo set");
    }

    pub fn bpm(&self) -> f32 {
        self.sequencer.bpm()
    }

    /// Select pattern set `index`; out-of-range indices are ignored.
    pub fn set_pattern(&mut self, index: usize) -> bool {
        let ok = self.sequencer.select_pattern(index);
        if ok {
            info!(index, name = %self.pattern_name(), "pattern set selected");
        } else {
            warn!(index, available = self.sequencer.pattern_count(), "no such pattern set");
        }
        ok
    }

    pub fn next_pattern(&mut self) -> usize {
        let index = self.sequencer.next_pattern();
        info!(index, name = %self.pattern_name(), "pattern set changed");
        index
    }

    pub fn pattern_index(&self) -> usize {
        self.sequencer.pattern_index()
    }

    pub fn pattern_name(&self) -> &str {
        &self.sequencer.bank().current().name
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.audio.set_master_gain(gain);
    }

    pub fn master_gain(&self) -> f32 {
        self.audio.master_gain()
    }

    pub fn set_swing(&mut self, swing: f32) {
        self.sequencer.set_swing(swing);
    }

    pub fn set_arp_pattern(&mut self, pattern: Vec<i8>) {
        self.arp.set_pattern(pattern);
    }

    /// Latest signals for `hand`, for display.
    pub fn signals(&self, hand: Hand) -> Option<&HandSignals> {
        self.gesture.signals(hand)
    }

    pub fn melody_hand(&self) -> Hand {
        self.melody_hand
    }

    pub fn drum_hand(&self) -> Hand {
        self.drum_hand
    }

    pub fn tempo_locked(&self) -> bool {
        self.tempo.is_locked()
    }

    pub fn gesture(&self) -> &GestureProcessor {
        &self.gesture
    }

    pub fn gesture_mut(&mut self) -> &mut GestureProcessor {
        &mut self.gesture
    }

    pub fn arp(&self) -> &Arpeggiator {
        &self.arp
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut StepSequencer {
        &mut self.sequencer
    }

    pub fn audio(&self) -> &AudioEngineContext {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioEngineContext {
        &mut self.audio
    }

    pub fn mixer(&self) -> SharedMixer {
        self.audio.mixer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::HandPose;

    fn engine() -> Engine {
        Engine::with_samples(&Config::default(), 8_000.0, SampleBank::synthesized(8_000.0))
    }

    #[test]
    fn absent_hands_play_nothing() {
        let mut e = engine();
        e.ingest(&PoseFrame::new(0.0));
        assert!(e.tick(0.0).is_empty());
    }

    #[test]
    fn melody_hand_triggers_lead() {
        let mut e = engine();
        e.ingest(&PoseFrame::new(0.0).with_hand(HandPose::new(Hand::Left).wrist_x(0.25).height(0.5).build()));
        let events = e.tick(0.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].voice, VoiceName::Lead);
        assert!(events[0].played);
    }

    #[test]
    fn tempo_pinch_retunes_both_clocks() {
        let mut e = engine();
        let pinched = HandPose::new(Hand::Right)
            .wrist_x(0.75)
            .height(0.75)
            .pinch(0.01)
            .build();
        e.ingest(&PoseFrame::new(0.0).with_hand(pinched));
        e.tick(0.0);
        let expected = e.tempo.map_height(e.signals(Hand::Right).map(|s| s.height).unwrap());
        assert_eq!(e.bpm(), expected);
        assert_eq!(e.arp().bpm(), expected);
        assert!(e.tempo_locked());
    }

    #[test]
    fn repinch_overrides_tempo_set_in_between() {
        let mut e = engine();
        let pinched = || {
            PoseFrame::new(0.0).with_hand(
                HandPose::new(Hand::Right)
                    .wrist_x(0.75)
                    .height(0.5)
                    .pinch(0.01)
                    .build(),
            )
        };

        e.ingest(&pinched());
        e.tick(0.0);
        let gesture_bpm = e.bpm();
        assert!(e.tempo_locked());

        e.ingest(&PoseFrame::new(0.1));
        e.tick(0.1);
        assert!(!e.tempo_locked());
        e.set_bpm(90.0);
        assert_eq!(e.bpm(), 90.0);

        e.ingest(&pinched());
        e.tick(0.2);
        assert!(e.tempo_locked());
        assert_eq!(e.bpm(), gesture_bpm);
        assert_eq!(e.arp().bpm(), gesture_bpm);
    }

    #[test]
    fn arpeggiator_follows_sequencer_tempo_from_config() {
        let mut config = Config::default();
        config.sequencer.bpm = 96.0;
        let e = Engine::with_samples(&config, 8_000.0, SampleBank::empty(8_000.0));
        assert_eq!(e.bpm(), 96.0);
        assert_eq!(e.arp().bpm(), 96.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn toml_sequencer_tempo_drives_both_hands() {
        let config = Config::from_toml_str("[sequencer]\nbpm = 96\n").unwrap();
        let e = Engine::with_samples(&config, 8_000.0, SampleBank::empty(8_000.0));
        assert_eq!(e.arp().bpm(), e.bpm());
        assert_eq!(e.bpm(), 96.0);
    }

    #[test]
    fn control_setters_clamp_and_validate() {
        let mut e = engine();
        e.set_bpm(1_000.0);
        assert_eq!(e.bpm(), 300.0);
        assert!(!e.set_pattern(99));
        assert!(e.set_pattern(3));
        assert_eq!(e.pattern_name(), "Breakbeat");
        assert_eq!(e.next_pattern(), 4);
        e.set_master_gain(-1.0);
        assert_eq!(e.master_gain(), 0.0);
    }
}
