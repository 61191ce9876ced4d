//! Decodes encoded audio (MP3 from the vendors, WAV accepted as well) into
//! multi-channel f32 PCM.

use std::io::Cursor;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as FormatError;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::probe::Hint;

use super::AudioBuffer;
use crate::tts::error::TtsError;

pub fn decode(bytes: &[u8]) -> Result<AudioBuffer, TtsError> {
    if bytes.is_empty() {
        return Err(TtsError::Decode("empty audio payload".to_string()));
    }
    decode_source(Box::new(Cursor::new(bytes.to_vec())))
}

fn decode_source(source: Box<dyn MediaSource>) -> Result<AudioBuffer, TtsError> {
    let stream = MediaSourceStream::new(source, Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            stream,
            &Default::default(),
            &Default::default(),
        )
        .map_err(|e| TtsError::Decode(format!("unrecognized audio container: {e}")))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| TtsError::Decode("no decodable audio track".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| TtsError::Decode(format!("unsupported codec: {e}")))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;

    let mut channels: Vec<Vec<f32>> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream is reported as an unexpected-EOF read.
            Err(FormatError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(FormatError::ResetRequired) => break,
            Err(err) => {
                return Err(TtsError::Decode(format!("packet read failed: {err}")));
            }
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder
            .decode(&packet)
            .map_err(|e| TtsError::Decode(format!("decode failed: {e}")))?;
        if sample_rate.is_none() {
            sample_rate = Some(decoded.spec().rate);
        }
        append(&mut channels, &decoded);
    }

    if channels.iter().all(Vec::is_empty) {
        return Err(TtsError::Decode("no audio frames decoded".to_string()));
    }

    let sample_rate =
        sample_rate.ok_or_else(|| TtsError::Decode("unknown sample rate".to_string()))?;
    Ok(AudioBuffer {
        channels,
        sample_rate,
    })
}

fn append(channels: &mut Vec<Vec<f32>>, decoded: &AudioBufferRef<'_>) {
    match decoded {
        AudioBufferRef::F32(buf) => extend(channels, buf.as_ref()),
        AudioBufferRef::F64(buf) => extend(channels, buf.as_ref()),
        AudioBufferRef::U8(buf) => extend(channels, buf.as_ref()),
        AudioBufferRef::U16(buf) => extend(channels, buf.as_ref()),
        AudioBufferRef::U24(buf) => extend(channels, buf.as_ref()),
        AudioBufferRef::U32(buf) => extend(channels, buf.as_ref()),
        AudioBufferRef::S8(buf) => extend(channels, buf.as_ref()),
        AudioBufferRef::S16(buf) => extend(channels, buf.as_ref()),
        AudioBufferRef::S24(buf) => extend(channels, buf.as_ref()),
        AudioBufferRef::S32(buf) => extend(channels, buf.as_ref()),
    }
}

fn extend<T>(channels: &mut Vec<Vec<f32>>, buf: &symphonia::core::audio::AudioBuffer<T>)
where
    T: symphonia::core::sample::Sample,
    f32: FromSample<T>,
{
    let count = buf.spec().channels.count();
    if channels.is_empty() {
        channels.resize(count, Vec::new());
    }
    for (index, channel) in channels.iter_mut().enumerate().take(count) {
        channel.extend(buf.chan(index).iter().map(|v| f32::from_sample(*v)));
    }
}
