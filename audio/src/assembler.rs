//! Multi-clip assembly.
//!
//! Stitches per-utterance WAV buffers into one file. Clips are decoded,
//! coerced to a single target format, separated by silence and re-encoded.
//! Assembly never fails: undecodable clips are skipped, and if nothing
//! decodes the first input is returned untouched.

use std::time::Duration;

use tracing::{debug, warn};

use crate::codec::wav::{self, WavHeader};
use crate::pcm::{AudioSegment, Format};

/// Default gap inserted between clips.
pub const DEFAULT_SILENCE_PAD: Duration = Duration::from_millis(500);

/// Options for configuring an [`Assembler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblerOptions {
    /// Format every clip is coerced to, and the output format.
    pub target: Format,
    /// Silence inserted between consecutive clips.
    pub silence_pad: Duration,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            target: Format::STEREO_44K_F32,
            silence_pad: DEFAULT_SILENCE_PAD,
        }
    }
}

impl AssemblerOptions {
    /// Sets the output format.
    pub fn with_target(mut self, target: Format) -> Self {
        self.target = target;
        self
    }

    /// Sets the gap between clips.
    pub fn with_silence_pad(mut self, pad: Duration) -> Self {
        self.silence_pad = pad;
        self
    }

    /// Sets the gap between clips in seconds. Negative or non-finite values
    /// mean no gap.
    pub fn with_silence_pad_secs(self, secs: f64) -> Self {
        self.with_silence_pad(pad_from_secs(secs))
    }
}

/// Outcome of one assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssemblyReport {
    /// Clips that made it into the output.
    pub retained: usize,
    /// Clips dropped because they failed to decode.
    pub skipped: usize,
    /// True when no clip decoded and the first input was returned as-is.
    pub fallback: bool,
    /// Playback duration of the output, when known.
    pub duration: Duration,
}

/// Concatenates WAV clips with silence between them.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    options: AssemblerOptions,
}

impl Assembler {
    /// Creates an assembler.
    pub fn new(options: AssemblerOptions) -> Self {
        Self { options }
    }

    /// Returns the assembler options.
    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Combines the clips in order. See [`Assembler::combine_with_report`].
    pub fn combine<B: AsRef<[u8]>>(&self, segments: &[B]) -> Vec<u8> {
        self.combine_with_report(segments).0
    }

    /// Combines the clips in order and reports what happened.
    ///
    /// - No clips: empty output.
    /// - One clip: returned byte-for-byte, not decoded.
    /// - Several clips: each decodable clip is coerced to the target format
    ///   and the silence pad goes between consecutive retained clips.
    /// - Nothing decodes: the first clip's bytes are returned unmodified.
    pub fn combine_with_report<B: AsRef<[u8]>>(&self, segments: &[B]) -> (Vec<u8>, AssemblyReport) {
        match segments {
            [] => return (Vec::new(), AssemblyReport::default()),
            [only] => {
                let only = only.as_ref();
                let report = AssemblyReport {
                    retained: 1,
                    duration: WavHeader::parse(only).map(|h| h.duration()).unwrap_or_default(),
                    ..Default::default()
                };
                return (only.to_vec(), report);
            }
            _ => {}
        }

        let target = self.options.target;
        let mut decoded = Vec::with_capacity(segments.len());
        let mut skipped = 0;

        for (index, segment) in segments.iter().enumerate() {
            match wav::decode(segment.as_ref()) {
                Ok(clip) => decoded.push(clip.convert(target)),
                Err(err) => {
                    warn!(index, error = %err, "assembler: skipping undecodable segment");
                    skipped += 1;
                }
            }
        }

        if decoded.is_empty() {
            warn!(count = segments.len(), "assembler: no segment decoded, returning first segment as-is");
            let report = AssemblyReport {
                skipped,
                fallback: true,
                ..Default::default()
            };
            return (segments[0].as_ref().to_vec(), report);
        }

        let pad = AudioSegment::silence(target, self.options.silence_pad);
        let total: usize = decoded.iter().map(|c| c.samples().len()).sum::<usize>()
            + pad.samples().len() * (decoded.len() - 1);

        let mut output = AudioSegment::new(target, Vec::with_capacity(total));
        for (i, clip) in decoded.iter().enumerate() {
            if i > 0 {
                output.extend(&pad);
            }
            output.extend(clip);
        }

        let report = AssemblyReport {
            retained: decoded.len(),
            skipped,
            fallback: false,
            duration: output.duration(),
        };
        debug!(
            retained = report.retained,
            skipped = report.skipped,
            duration_ms = report.duration.as_millis() as u64,
            "assembler: combined segments"
        );

        (wav::encode_segment(&output), report)
    }
}

/// Combines WAV clips into 44.1kHz stereo float output with
/// `silence_pad_seconds` of silence between them.
pub fn combine<B: AsRef<[u8]>>(segments: &[B], silence_pad_seconds: f64) -> Vec<u8> {
    Assembler::new(AssemblerOptions::default().with_silence_pad_secs(silence_pad_seconds)).combine(segments)
}

fn pad_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
