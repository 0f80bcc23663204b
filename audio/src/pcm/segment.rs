//! In-memory audio segments and naive format coercion.

use super::Format;
use std::time::Duration;

/// A decoded clip: interleaved samples in `[-1, 1]` plus the format they were
/// produced in.
///
/// Samples are held as `f32` regardless of [`Format::encoding`]; the encoding
/// records how the clip is (or was) stored in its container.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    samples: Vec<f32>,
    format: Format,
}

impl AudioSegment {
    /// Creates a segment from interleaved samples.
    pub fn new(format: Format, samples: Vec<f32>) -> Self {
        Self { samples, format }
    }

    /// Creates a segment of digital silence lasting `duration`.
    pub fn silence(format: Format, duration: Duration) -> Self {
        let frames = format.frames_in_duration(duration);
        Self::new(format, vec![0.0; frames * format.channels as usize])
    }

    /// Returns the audio format of this segment.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consumes the segment and returns the interleaved samples.
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Returns the number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.format.frames(self.samples.len())
    }

    /// Returns true if the segment holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the playback duration.
    pub fn duration(&self) -> Duration {
        if self.format.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.format.sample_rate as f64)
    }

    /// Appends another segment's samples. Formats must already agree on
    /// channel count; the caller is responsible for coercing first.
    pub fn extend(&mut self, other: &AudioSegment) {
        debug_assert_eq!(self.format.channels, other.format.channels);
        self.samples.extend_from_slice(&other.samples);
    }

    /// Coerces the segment to `target` using naive channel mapping and naive
    /// sample-rate conversion.
    ///
    /// Not a real resampler: frames are duplicated or dropped by nearest
    /// index, which aliases when downsampling. Clip length is preserved to
    /// within one output frame.
    pub fn convert(&self, target: Format) -> AudioSegment {
        let remapped = remap_channels(&self.samples, self.format.channels, target.channels);
        let resampled = resample_nearest(
            &remapped,
            target.channels,
            self.format.sample_rate,
            target.sample_rate,
        );
        AudioSegment::new(target, resampled)
    }
}

/// Maps interleaved samples from `src` channels to `dst` channels.
///
/// Mono fans out by duplication, any multi-channel input folds to mono by
/// averaging, and otherwise each output channel takes the matching input
/// channel (the last input channel when the output has more).
fn remap_channels(samples: &[f32], src: u16, dst: u16) -> Vec<f32> {
    if src == dst || src == 0 || dst == 0 {
        return samples.to_vec();
    }
    let src = src as usize;
    let dst = dst as usize;
    let frames = samples.len() / src;
    let mut out = Vec::with_capacity(frames * dst);

    for frame in samples.chunks_exact(src) {
        if dst == 1 {
            out.push(frame.iter().sum::<f32>() / src as f32);
            continue;
        }
        for c in 0..dst {
            out.push(frame[c.min(src - 1)]);
        }
    }
    out
}

/// Changes sample rate by nearest-index frame duplication/decimation.
fn resample_nearest(samples: &[f32], channels: u16, src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate || src_rate == 0 || dst_rate == 0 || channels == 0 {
        return samples.to_vec();
    }
    let channels = channels as usize;
    let in_frames = samples.len() / channels;
    if in_frames == 0 {
        return Vec::new();
    }

    let ratio = src_rate as f64 / dst_rate as f64;
    let out_frames = (in_frames as f64 / ratio).round() as usize;
    let mut out = Vec::with_capacity(out_frames * channels);

    for j in 0..out_frames {
        let src_frame = ((j as f64 * ratio) as usize).min(in_frames - 1);
        let start = src_frame * channels;
        out.extend_from_slice(&samples[start..start + channels]);
    }
    out
}
