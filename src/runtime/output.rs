//! cpal output stream fed from the shared mixer.
//!
//! Opening happens in two steps so the engine can be built at the device's
//! sample rate before any audio flows: [`OutputDevice::open_default`] picks
//! the device and its config, then [`OutputDevice::start`] builds and plays a
//! stream that renders the channel pool into every device channel.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use crate::{
    engine::{lock_mixer, SharedMixer},
    EngineError, MAX_BLOCK_SIZE,
};

pub struct OutputDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl OutputDevice {
    /// The host's default output device at its default config.
    pub fn open_default() -> Result<Self, EngineError> {
        let host = cpal::default_host();
        info!(host = ?host.id(), "audio host");

        let device = host.default_output_device().ok_or(EngineError::NoOutputDevice)?;
        let config = device.default_output_config()?;
        info!(
            device = %device.name().unwrap_or_else(|_| "<unnamed>".into()),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            format = ?config.sample_format(),
            "audio device"
        );

        Ok(Self { device, config })
    }

    pub fn sample_rate(&self) -> f32 {
        self.config.sample_rate().0 as f32
    }

    pub fn channels(&self) -> usize {
        self.config.channels() as usize
    }

    /// Build the stream and start it playing.
    pub fn start(self, mixer: SharedMixer) -> Result<AudioOutput, EngineError> {
        let channels = self.channels();
        let sample_rate = self.sample_rate();
        let stream_config: cpal::StreamConfig = self.config.config();

        let stream = match self.config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&self.device, &stream_config, mixer, channels),
            cpal::SampleFormat::I16 => build_stream::<i16>(&self.device, &stream_config, mixer, channels),
            cpal::SampleFormat::U16 => build_stream::<u16>(&self.device, &stream_config, mixer, channels),
            other => return Err(EngineError::UnsupportedSampleFormat(format!("{other:?}"))),
        }?;

        stream.play()?;
        info!(sample_rate, "audio stream started");

        Ok(AudioOutput {
            _stream: stream,
            sample_rate,
            channels,
        })
    }
}

/// A running output stream. Dropping it stops audio.
pub struct AudioOutput {
    _stream: cpal::Stream,
    sample_rate: f32,
    channels: usize,
}

impl AudioOutput {
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: SharedMixer,
    channels: usize,
) -> Result<cpal::Stream, EngineError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let mut block = vec![0.0f32; MAX_BLOCK_SIZE];
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut pool = lock_mixer(&mixer);
            write_interleaved(data, channels, &mut block, |buf| pool.render(buf));
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;
    Ok(stream)
}

/// Fill interleaved `data` block by block from a mono `render`, copying each
/// mono sample to every channel.
fn write_interleaved<T, F>(data: &mut [T], channels: usize, block: &mut [f32], mut render: F)
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
    F: FnMut(&mut [f32]),
{
    let channels = channels.max(1);
    let block_frames = block.len().max(1);
    for frames in data.chunks_mut(block_frames * channels) {
        let n = frames.len() / channels;
        let mono = &mut block[..n];
        render(mono);
        for (frame, &s) in frames.chunks_mut(channels).zip(mono.iter()) {
            for out in frame {
                *out = T::from_sample(s);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_is_copied_to_every_channel_across_blocks() {
        let mut data = vec![0.0f32; 10];
        let mut block = vec![0.0f32; 2];
        let mut next = 0.0;
        write_interleaved(&mut data, 2, &mut block, |buf| {
            for s in buf.iter_mut() {
                next += 0.1;
                *s = next;
            }
        });
        let left: Vec<f32> = data.iter().step_by(2).copied().collect();
        let right: Vec<f32> = data.iter().skip(1).step_by(2).copied().collect();
        assert_eq!(left, right);
        assert!(left.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn integer_formats_are_converted() {
        let mut data = vec![0i16; 4];
        let mut block = vec![0.0f32; 8];
        write_interleaved(&mut data, 1, &mut block, |buf| buf.fill(1.0));
        assert!(data.iter().all(|&s| s > 32_000));
    }
}
