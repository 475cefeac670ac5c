//! The scheduler loop.
//!
//! Two loops share one [`Engine`] behind a mutex. The caller's gesture loop
//! pushes pose frames in at camera rate through [`Runtime::ingest`]; a
//! dedicated thread ticks the engine every few milliseconds regardless of
//! frame rate. Trigger events leave through an `rtrb` ring buffer; if nobody
//! drains it the newest events are dropped, never the audio.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, info, trace};

use super::{
    engine::Engine,
    output::{AudioOutput, OutputDevice},
};
use crate::{config::Config, gesture::PoseFrame, trigger::TriggerEvent, EngineError};

pub struct Runtime {
    engine: Arc<Mutex<Engine>>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    events: Option<Consumer<TriggerEvent>>,
    started: Instant,
}

impl Runtime {
    /// Open the default output device, build an engine at its sample rate
    /// and start both the audio stream and the scheduler.
    ///
    /// Fails only when the device can't be opened; missing drum samples just
    /// leave those instruments silent.
    pub fn start(config: &Config) -> Result<(Self, AudioOutput), EngineError> {
        let device = OutputDevice::open_default()?;
        let engine = Engine::new(config, device.sample_rate());
        info!(
            loaded = engine.audio().samples().loaded_count(),
            "drum samples ready"
        );
        let output = device.start(engine.mixer())?;
        let runtime = Self::spawn(
            engine,
            Duration::from_millis(config.tick_ms.max(1)),
            config.event_queue.max(1),
        )?;
        Ok((runtime, output))
    }

    /// Run `engine` on a scheduler thread ticking every `tick`.
    pub fn spawn(engine: Engine, tick: Duration, event_capacity: usize) -> Result<Self, EngineError> {
        let engine = Arc::new(Mutex::new(engine));
        let running = Arc::new(AtomicBool::new(true));
        let (producer, consumer) = RingBuffer::new(event_capacity);
        let started = Instant::now();

        let thread = thread::Builder::new()
            .name("gestune-scheduler".into())
            .spawn({
                let engine = Arc::clone(&engine);
                let running = Arc::clone(&running);
                move || scheduler_loop(engine, running, producer, tick, started)
            })
            .map_err(EngineError::Thread)?;

        Ok(Self {
            engine,
            running,
            thread: Some(thread),
            events: Some(consumer),
            started,
        })
    }

    /// Seconds since the runtime started; use it to timestamp pose frames.
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn ingest(&self, frame: &PoseFrame) {
        self.lock().ingest(frame);
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn set_bpm(&self, bpm: f32) {
        self.with_engine(|e| e.set_bpm(bpm));
    }

    pub fn set_pattern(&self, index: usize) -> bool {
        self.with_engine(|e| e.set_pattern(index))
    }

    pub fn next_pattern(&self) -> usize {
        self.with_engine(Engine::next_pattern)
    }

    pub fn set_master_gain(&self, gain: f32) {
        self.with_engine(|e| e.set_master_gain(gain));
    }

    pub fn set_swing(&self, swing: f32) {
        self.with_engine(|e| e.set_swing(swing));
    }

    /// The trigger event stream. There is one consumer; the first call gets it.
    pub fn take_events(&mut self) -> Option<Consumer<TriggerEvent>> {
        self.events.take()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the scheduler thread and wait for it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                debug!("scheduler thread panicked");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.stop();
    }
}

fn scheduler_loop(
    engine: Arc<Mutex<Engine>>,
    running: Arc<AtomicBool>,
    mut events: Producer<TriggerEvent>,
    tick: Duration,
    started: Instant,
) {
    debug!(tick_ms = tick.as_millis() as u64, "scheduler started");
    let mut dropped = 0u64;
    while running.load(Ordering::Acquire) {
        let now = started.elapsed().as_secs_f64();
        let fired = engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick(now);
        for event in fired {
            if events.push(event).is_err() {
                dropped += 1;
                trace!(dropped, "event queue full");
            }
        }
        thread::sleep(tick);
    }
    debug!(dropped, "scheduler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gesture::{Hand, HandPose},
        io::SampleBank,
        trigger::VoiceName,
    };

    fn engine() -> Engine {
        Engine::with_samples(&Config::default(), 8_000.0, SampleBank::synthesized(8_000.0))
    }

    #[test]
    fn scheduler_ticks_without_frames_and_stops() {
        let runtime = Runtime::spawn(engine(), Duration::from_millis(1), 16).unwrap();
        thread::sleep(Duration::from_millis(10));
        assert!(runtime.is_running());
        runtime.shutdown();
    }

    #[test]
    fn ingested_frames_produce_events() {
        let mut runtime = Runtime::spawn(engine(), Duration::from_millis(1), 64).unwrap();
        let mut events = runtime.take_events().unwrap();
        assert!(runtime.take_events().is_none());

        let frame = PoseFrame::new(runtime.elapsed())
            .with_hand(HandPose::new(Hand::Left).height(0.5).build());
        runtime.ingest(&frame);

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut lead = None;
        while lead.is_none() && Instant::now() < deadline {
            while let Ok(ev) = events.pop() {
                if ev.voice == VoiceName::Lead {
                    lead = Some(ev);
                }
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert!(lead.is_some());
    }

    #[test]
    fn control_setters_reach_the_engine() {
        let runtime = Runtime::spawn(engine(), Duration::from_millis(5), 4).unwrap();
        runtime.set_bpm(90.0);
        runtime.set_master_gain(0.5);
        assert!(runtime.set_pattern(2));
        runtime.with_engine(|e| {
            assert_eq!(e.bpm(), 90.0);
            assert_eq!(e.master_gain(), 0.5);
            assert_eq!(e.pattern_index(), 2);
        });
    }
}
