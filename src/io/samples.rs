//! Instrument sample assets.
//!
//! A [`SampleBank`] holds at most one mono buffer per [`Instrument`]. Buffers
//! come either from the synthesized kit in [`crate::voices`] or from WAV files
//! in a directory (`kick.wav`, `snare.wav`, `hihat.wav`, `hightom.wav`,
//! `crashcymbal.wav`).
//!
//! Asset problems never leave this module as errors. A file that is missing
//! or fails to decode leaves its instrument empty and is logged at `warn`
//! once; triggering an empty instrument later is silent.
//!
//! ```no_run
//! use gestune::io::SampleBank;
//!
//! let mut bank = SampleBank::load_dir("assets/drums", 48_000.0);
//! println!("{} of 5 instruments loaded", bank.loaded_count());
//! ```

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    sequencing::{Instrument, PerInstrument},
    voices, AudioBuffer,
};

#[derive(Debug)]
pub enum SampleError {
    Io(std::io::Error),
    Decode(String),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Io(err) => write!(f, "could not read sample: {err}"),
            SampleError::Decode(msg) => write!(f, "could not decode sample: {msg}"),
        }
    }
}

impl std::error::Error for SampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SampleError::Io(err) => Some(err),
            SampleError::Decode(_) => None,
        }
    }
}

impl From<hound::Error> for SampleError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => SampleError::Io(io),
            other => SampleError::Decode(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleBank {
    sample_rate: f32,
    samples: PerInstrument<Option<AudioBuffer>>,
    warned: PerInstrument<bool>,
}

impl SampleBank {
    /// A bank with no instruments loaded.
    pub fn empty(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            samples: PerInstrument([None, None, None, None, None]),
            warned: PerInstrument::splat(false),
        }
    }

    /// Every instrument backed by its synthesized one-shot.
    pub fn synthesized(sample_rate: f32) -> Self {
        let mut bank = Self::empty(sample_rate);
        for inst in Instrument::ALL {
            bank.insert(inst, voices::render(inst, sample_rate));
        }
        bank
    }

    /// Load each instrument's WAV file from `dir`.
    ///
    /// Files that can't be read leave their instrument silent.
    pub fn load_dir(dir: impl AsRef<Path>, sample_rate: f32) -> Self {
        let dir = dir.as_ref();
        let mut bank = Self::empty(sample_rate);
        for inst in Instrument::ALL {
            let path = dir.join(inst.file_name());
            match load_wav(&path, sample_rate) {
                Ok(data) => {
                    debug!(instrument = %inst, path = %path.display(), frames = data.len(), "loaded sample");
                    bank.insert(inst, data);
                }
                Err(err) => {
                    warn!(instrument = %inst, path = %path.display(), %err, "sample unavailable, instrument will be silent");
                    bank.warned[inst] = true;
                }
            }
        }
        bank
    }

    pub fn insert(&mut self, instrument: Instrument, data: Vec<f32>) {
        self.samples[instrument] = Some(AudioBuffer::from(data));
        self.warned[instrument] = false;
    }

    pub fn remove(&mut self, instrument: Instrument) {
        self.samples[instrument] = None;
    }

    /// Buffer for `instrument`, or `None` when it has no sample.
    ///
    /// The first miss for an instrument is logged; later misses are silent.
    pub fn get(&mut self, instrument: Instrument) -> Option<AudioBuffer> {
        let sample = self.samples[instrument].clone();
        if sample.is_none() && !self.warned[instrument] {
            warn!(instrument = %instrument, "no sample loaded, hits will be silent");
            self.warned[instrument] = true;
        }
        sample
    }

    pub fn contains(&self, instrument: Instrument) -> bool {
        self.samples[instrument].is_some()
    }

    pub fn loaded_count(&self) -> usize {
        Instrument::ALL.iter().filter(|&&i| self.contains(i)).count()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

/// Decode a WAV file into mono f32 at `target_rate`.
///
/// Multi-channel files are averaged down to mono; files at another rate are
/// linearly resampled.
pub fn load_wav(path: &Path, target_rate: f32) -> Result<Vec<f32>, SampleError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    if mono.is_empty() {
        return Err(SampleError::Decode(format!("{} has no audio frames", path.display())));
    }

    Ok(resample_linear(&mono, spec.sample_rate as f32, target_rate))
}

/// Linear-interpolation resampler; returns the input unchanged when the rates match.
pub fn resample_linear(input: &[f32], from_rate: f32, to_rate: f32) -> Vec<f32> {
    if input.is_empty() || from_rate <= 0.0 || to_rate <= 0.0 || from_rate == to_rate {
        return input.to_vec();
    }
    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((input.len() as f64) / ratio).round().max(1.0) as usize;
    let last = input.len() - 1;
    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = (pos.floor() as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = (pos - idx as f64) as f32;
            input[idx] + (input[next] - input[idx]) * frac.clamp(0.0, 1.0)
        })
        .collect()
}

/// Where the drum kit comes from.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SampleSource {
    #[default]
    Synthesized,
    Directory(PathBuf),
    /// No samples at all; every drum hit is silent.
    None,
}

impl SampleSource {
    pub fn load(&self, sample_rate: f32) -> SampleBank {
        match self {
            SampleSource::Synthesized => SampleBank::synthesized(sample_rate),
            SampleSource::Directory(dir) => SampleBank::load_dir(dir, sample_rate),
            SampleSource::None => SampleBank::empty(sample_rate),
        }
    }
}
