pub mod decode;
pub mod playback;
pub mod wav;

/// Decoded PCM audio: one `Vec<f32>` per channel, samples in [-1.0, 1.0].
/// Owned transiently by the pipeline for a single playback or export.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Frames per channel; channels are expected to be equal length.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}
