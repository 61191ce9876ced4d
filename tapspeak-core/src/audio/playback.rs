//! Audio playback using cpal
//! Resamples decoded buffers to the native device rate if needed

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig, SupportedStreamConfig,
};
use rubato::{FftFixedIn, Resampler};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::AudioBuffer;

/// Output through the default device. Created at most once per session and
/// reused; creation is the pipeline's "acquire" step.
pub struct AudioPlayer {
    device: Device,
    supported_config: SupportedStreamConfig,
}

/// Playback handle - dropping stops playback (RAII)
pub struct AudioPlayback {
    _stream: Stream,
    finished: Arc<AtomicBool>,
}

impl AudioPlayback {
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Wait for playback to complete
    pub async fn wait(&self) {
        while !self.is_finished() {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }
    }
}

impl AudioPlayer {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no output device available")?;

        let supported_config = device
            .default_output_config()
            .context("failed to get default output config")?;

        Ok(Self {
            device,
            supported_config,
        })
    }

    /// Starts and immediately drops a one-frame silent stream. Keeps the
    /// platform audio session warm while a network call is pending.
    pub fn unlock(&self) -> Result<()> {
        let silence = AudioBuffer {
            channels: vec![vec![0.0]],
            sample_rate: self.supported_config.sample_rate().0,
        };
        let _ = self.play(&silence)?;
        Ok(())
    }

    /// Schedule immediate playback, returns a handle that stops on drop.
    pub fn play(&self, audio: &AudioBuffer) -> Result<AudioPlayback> {
        let native_rate = self.supported_config.sample_rate().0;
        let native_channels = self.supported_config.channels() as usize;
        let sample_format = self.supported_config.sample_format();
        let config: StreamConfig = self.supported_config.clone().into();

        let resampled: Vec<Vec<f32>> = audio
            .channels
            .iter()
            .map(|channel| resample(channel, audio.sample_rate, native_rate))
            .collect::<Result<_>>()?;
        let samples = interleave_for_device(&resampled, native_channels);

        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            SampleFormat::F32 => {
                self.build_stream::<f32>(&config, samples, position, finished.clone())?
            }
            SampleFormat::I16 => {
                self.build_stream::<i16>(&config, samples, position, finished.clone())?
            }
            format => anyhow::bail!("unsupported sample format: {:?}", format),
        };

        stream.play().context("failed to start playback stream")?;

        Ok(AudioPlayback {
            _stream: stream,
            finished,
        })
    }

    fn build_stream<T>(
        &self,
        config: &StreamConfig,
        samples: Arc<Vec<f32>>,
        position: Arc<AtomicUsize>,
        finished: Arc<AtomicBool>,
    ) -> Result<Stream>
    where
        T: SizedSample + FromSample<f32> + Default + Send + 'static,
    {
        self.device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let pos = position.load(Ordering::SeqCst);
                    let remaining = samples.len().saturating_sub(pos);

                    if remaining == 0 {
                        data.fill(T::default());
                        finished.store(true, Ordering::SeqCst);
                        return;
                    }

                    let to_copy = remaining.min(data.len());
                    for (i, &sample) in samples[pos..pos + to_copy].iter().enumerate() {
                        data[i] = T::from_sample(sample);
                    }

                    if to_copy < data.len() {
                        data[to_copy..].fill(T::default());
                    }

                    position.store(pos + to_copy, Ordering::SeqCst);
                },
                move |err| {
                    tracing::error!(error = ?err, "playback stream error");
                },
                None,
            )
            .context("failed to build output stream")
    }
}

fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    let chunk_size = 1024;
    let mut resampler =
        FftFixedIn::<f32>::new(source_rate as usize, target_rate as usize, chunk_size, 2, 1)
            .context("failed to create resampler")?;

    let mut output = Vec::new();
    let mut pos = 0;

    while pos < samples.len() {
        let frames_needed = resampler.input_frames_next();
        let end = (pos + frames_needed).min(samples.len());

        let mut input_chunk = samples[pos..end].to_vec();
        if input_chunk.len() < frames_needed {
            input_chunk.resize(frames_needed, 0.0);
        }

        let input = vec![input_chunk];
        match resampler.process(&input, None) {
            Ok(resampled) => {
                if let Some(chunk) = resampled.into_iter().next() {
                    output.extend(chunk);
                }
            }
            Err(e) => {
                anyhow::bail!("resampling failed: {:?}", e);
            }
        }

        pos = end;
        if end == samples.len() {
            break;
        }
    }

    Ok(output)
}

/// Interleaves decoded channels for the device layout. A matching channel
/// count interleaves directly; anything else is downmixed to mono and
/// duplicated across the device channels.
fn interleave_for_device(channels: &[Vec<f32>], device_channels: usize) -> Vec<f32> {
    if channels.len() == device_channels {
        let frames = channels.first().map_or(0, Vec::len);
        let mut output = Vec::with_capacity(frames * device_channels);
        for frame in 0..frames {
            for channel in channels {
                output.push(channel.get(frame).copied().unwrap_or(0.0));
            }
        }
        return output;
    }

    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    let mut output = Vec::with_capacity(frames * device_channels);
    for frame in 0..frames {
        let sum: f32 = channels
            .iter()
            .map(|c| c.get(frame).copied().unwrap_or(0.0))
            .sum();
        let mono = sum / channels.len().max(1) as f32;
        for _ in 0..device_channels {
            output.push(mono);
        }
    }
    output
}
