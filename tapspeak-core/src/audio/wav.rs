//! 16-bit PCM WAV serialization and buffer concatenation. Pure functions,
//! no I/O.

use anyhow::{bail, Result};

use super::AudioBuffer;

const HEADER_LEN: usize = 44;

/// Serializes a decoded buffer into a canonical RIFF/WAVE byte sequence with
/// a single `fmt ` chunk (PCM, 16-bit) and one `data` chunk.
///
/// Samples are clamped to [-1.0, 1.0] and scaled to signed 16-bit (negative
/// values by 32768, non-negative by 32767), interleaved channel-by-channel
/// within each frame.
pub fn encode_wav(buffer: &AudioBuffer) -> Vec<u8> {
    let channels = buffer.channel_count() as u16;
    let frames = buffer.frame_count();
    let data_len = frames * channels as usize * 2;

    let mut out = Vec::with_capacity(HEADER_LEN + data_len);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&((36 + data_len) as u32).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    // fmt chunk length, then audio format 1 = PCM
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&buffer.sample_rate.to_le_bytes());
    // byte rate, block align, bits per sample
    out.extend_from_slice(&(buffer.sample_rate * channels as u32 * 2).to_le_bytes());
    out.extend_from_slice(&(channels * 2).to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data_len as u32).to_le_bytes());

    for frame in 0..frames {
        for channel in &buffer.channels {
            let sample = channel.get(frame).copied().unwrap_or(0.0);
            out.extend_from_slice(&quantize(sample).to_le_bytes());
        }
    }

    out
}

fn quantize(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

/// Joins buffers end-to-end in input order. Fails on an empty list and on
/// mismatched channel count or sample rate between inputs.
pub fn concatenate(buffers: &[AudioBuffer]) -> Result<AudioBuffer> {
    let Some(first) = buffers.first() else {
        bail!("no buffers to concatenate");
    };

    let channel_count = first.channel_count();
    let sample_rate = first.sample_rate;
    for buffer in buffers {
        if buffer.channel_count() != channel_count || buffer.sample_rate != sample_rate {
            bail!(
                "buffer mismatch: expected {channel_count} channel(s) at {sample_rate} Hz, \
                 got {} at {}",
                buffer.channel_count(),
                buffer.sample_rate
            );
        }
    }

    let total_frames: usize = buffers.iter().map(AudioBuffer::frame_count).sum();
    let mut channels = vec![Vec::with_capacity(total_frames); channel_count];
    for buffer in buffers {
        for (target, source) in channels.iter_mut().zip(&buffer.channels) {
            target.extend_from_slice(source);
        }
    }

    Ok(AudioBuffer {
        channels,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn mono(samples: Vec<f32>, sample_rate: u32) -> AudioBuffer {
        AudioBuffer {
            channels: vec![samples],
            sample_rate,
        }
    }

    #[test]
    fn header_fields_sit_at_fixed_offsets() {
        let buffer = mono(vec![0.0; 100], 22050);
        let bytes = encode_wav(&buffer);

        assert_eq!(bytes.len(), 44 + 100 * 2);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(
            u32::from_le_bytes(bytes[4..8].try_into().unwrap()),
            36 + 200
        );
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 16);
        assert_eq!(u16::from_le_bytes(bytes[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(bytes[22..24].try_into().unwrap()), 1);
        assert_eq!(
            u32::from_le_bytes(bytes[24..28].try_into().unwrap()),
            22050
        );
        assert_eq!(
            u32::from_le_bytes(bytes[28..32].try_into().unwrap()),
            22050 * 2
        );
        assert_eq!(u16::from_le_bytes(bytes[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(bytes[34..36].try_into().unwrap()), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 200);
    }

    #[test]
    fn round_trips_within_one_quantization_step() {
        let samples = vec![0.0, 0.5, -0.5, 0.999, -0.999, 0.25, -1.0, 1.0];
        let buffer = mono(samples.clone(), 16000);
        let bytes = encode_wav(&buffer);

        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 16);

        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded.len(), samples.len());
        for (original, value) in samples.iter().zip(&decoded) {
            let restored = if *value < 0 {
                *value as f32 / 32768.0
            } else {
                *value as f32 / 32767.0
            };
            assert!(
                (original - restored).abs() <= 1.0 / 32768.0,
                "{original} decoded as {restored}"
            );
        }
    }

    #[test]
    fn out_of_range_samples_clamp_to_full_scale() {
        let clamped = encode_wav(&mono(vec![1.5], 8000));
        let full = encode_wav(&mono(vec![1.0], 8000));
        assert_eq!(clamped, full);
        assert_eq!(
            i16::from_le_bytes(clamped[44..46].try_into().unwrap()),
            32767
        );

        let negative = encode_wav(&mono(vec![-2.0], 8000));
        assert_eq!(
            i16::from_le_bytes(negative[44..46].try_into().unwrap()),
            -32768
        );
    }

    #[test]
    fn stereo_samples_interleave_frame_by_frame() {
        let buffer = AudioBuffer {
            channels: vec![vec![0.5, -0.5], vec![-0.25, 0.25]],
            sample_rate: 44100,
        };
        let bytes = encode_wav(&buffer);
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        // L0, R0, L1, R1
        assert_eq!(decoded[0], (0.5f32 * 32767.0) as i16);
        assert_eq!(decoded[1], (-0.25f32 * 32768.0) as i16);
        assert_eq!(decoded[2], (-0.5f32 * 32768.0) as i16);
        assert_eq!(decoded[3], (0.25f32 * 32767.0) as i16);
    }

    #[test]
    fn concatenate_joins_in_input_order() {
        let a = mono(vec![0.1, 0.2], 8000);
        let b = mono(vec![0.3], 8000);
        let joined = concatenate(&[a, b]).unwrap();
        assert_eq!(joined.channels[0], vec![0.1, 0.2, 0.3]);
        assert_eq!(joined.sample_rate, 8000);
    }

    #[test]
    fn concatenate_rejects_empty_and_mismatched_input() {
        assert!(concatenate(&[]).is_err());

        let a = mono(vec![0.1], 8000);
        let b = mono(vec![0.2], 16000);
        assert!(concatenate(&[a.clone(), b]).is_err());

        let stereo = AudioBuffer {
            channels: vec![vec![0.0], vec![0.0]],
            sample_rate: 8000,
        };
        assert!(concatenate(&[a, stereo]).is_err());
    }
}
