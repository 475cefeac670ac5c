//! gestune - play the gesture instrument from the keyboard
//!
//! Run with: cargo run -- --bpm 100 --samples assets/drums

mod simulator;

use std::{
    io::Write,
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use gestune::{io::SampleSource, runtime::Runtime, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

use simulator::{Command, KeyboardSimulator};

/// Frame interval of the simulated camera.
const FRAME: Duration = Duration::from_millis(33);

#[derive(Parser)]
#[command(name = "gestune")]
#[command(about = "Gesture-driven arpeggiator and drum machine", long_about = None)]
struct Cli {
    /// Starting tempo
    #[arg(short, long)]
    bpm: Option<f32>,

    /// Starting pattern set index
    #[arg(short, long)]
    pattern: Option<usize>,

    /// Master gain, 0..1
    #[arg(short, long)]
    gain: Option<f32>,

    /// Swing fraction, 0..0.2
    #[arg(long)]
    swing: Option<f32>,

    /// Directory with kick.wav, snare.wav, hihat.wav, hightom.wav, crashcymbal.wav
    #[arg(short, long)]
    samples: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> EyreResult<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("failed to read {}", path.display()))?;
                Config::from_toml_str(&text)?
            }
            None => Config::default(),
        };
        if let Some(bpm) = self.bpm {
            config.sequencer.bpm = bpm;
            config.arp.bpm = bpm;
        }
        if let Some(gain) = self.gain {
            config.master_gain = gain;
        }
        if let Some(swing) = self.swing {
            config.sequencer.swing = swing;
        }
        if let Some(dir) = &self.samples {
            config.samples = SampleSource::Directory(dir.clone());
        }
        Ok(config)
    }
}

/// Leaves raw mode however the loop exits.
struct RawMode;

impl RawMode {
    fn enable() -> EyreResult<Self> {
        enable_raw_mode().wrap_err("failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    let (mut runtime, output) = Runtime::start(&config).wrap_err("failed to start audio")?;
    if let Some(index) = cli.pattern {
        runtime.set_pattern(index);
    }
    let mut events = runtime
        .take_events()
        .ok_or_else(|| color_eyre::eyre::eyre!("trigger events already taken"))?;

    info!(sample_rate = output.sample_rate(), channels = output.channels(), "playing");
    println!("gestune: w/s a/d q = melody hand, arrows 1-5 f e = drum hand, n + - [ ] = transport, esc quits");

    let mut sim = KeyboardSimulator::new(config.melody_hand);
    let raw = RawMode::enable()?;
    let mut stdout = std::io::stdout();
    let mut next_frame = Instant::now();

    loop {
        let wait = next_frame.saturating_duration_since(Instant::now());
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match sim.handle_key(key) {
                        Command::Quit => break,
                        Command::NextPattern => {
                            runtime.next_pattern();
                        }
                        Command::TempoBy(delta) => {
                            runtime.with_engine(|e| e.set_bpm(e.bpm() + delta));
                        }
                        Command::GainBy(delta) => {
                            runtime.with_engine(|e| e.set_master_gain(e.master_gain() + delta));
                        }
                        Command::None => {}
                    }
                }
            }
        }

        if Instant::now() >= next_frame {
            runtime.ingest(&sim.frame(runtime.elapsed()));
            next_frame += FRAME;
        }

        while let Ok(ev) = events.pop() {
            let step = ev.step.map_or_else(|| "--".to_string(), |s| format!("{s:02}"));
            // raw mode: carriage return by hand
            write!(
                stdout,
                "[{:8.3}] {step} {:<8} vel {:.2} gain {:.3}{}\r\n",
                ev.timestamp,
                ev.voice.to_string(),
                ev.velocity,
                ev.gain,
                if ev.played { "" } else { " (silent)" }
            )?;
        }
        stdout.flush()?;
    }

    drop(raw);
    let (bpm, pattern) = runtime.with_engine(|e| (e.bpm(), e.pattern_name().to_string()));
    runtime.shutdown();
    println!("stopped at {bpm} BPM on {pattern}");
    Ok(())
}
