//! Procedural speech synthesis.
//!
//! Produces a voiced buzz shaped like speech: three harmonics of the voice's
//! fundamental plus two formant partials, gated by [`speech_envelope`] and
//! dithered with uniform noise. It is a stand-in for neural TTS, not an
//! attempt at intelligible speech.

use std::f64::consts::PI;

use rand::Rng;

use super::envelope::speech_envelope;
use super::profile::VoiceCharacteristics;
use crate::pcm::{AudioSegment, Format, SampleEncoding};

/// Characters spoken per second when estimating clip length.
pub const CHARS_PER_SECOND: f64 = 15.0;
/// Extra time added for each sentence-terminal mark.
pub const SENTENCE_PAUSE_SECONDS: f64 = 0.5;
/// Shortest clip the generator produces.
pub const MIN_DURATION_SECONDS: f64 = 2.0;
/// Longest clip the generator produces.
pub const MAX_DURATION_SECONDS: f64 = 30.0;
/// Peak amplitude of the additive noise.
pub const NOISE_AMPLITUDE: f64 = 0.05;

/// Harmonic structure: (multiple of the fundamental, amplitude).
const HARMONICS: [(f64, f64); 3] = [(1.0, 0.3), (2.0, 0.15), (3.0, 0.10)];

/// Formant partials, as multiples of the fundamental.
const RESONANCE_RATIO: f64 = 3.5;
const BRIGHTNESS_RATIO: f64 = 7.2;
const FORMANT_GAIN: f64 = 0.2;

/// Estimates how long `text` takes to say, in seconds.
///
/// One second per 15 characters, plus half a second per `.`, `!` or `?`,
/// clamped to `[2, 30]`. This value is the authoritative clip length.
pub fn estimate_duration(text: &str) -> f64 {
    let base = text.chars().count() as f64 / CHARS_PER_SECOND;
    let stops = text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();
    (base + stops as f64 * SENTENCE_PAUSE_SECONDS).clamp(MIN_DURATION_SECONDS, MAX_DURATION_SECONDS)
}

/// Speaking rate for `text` spread over `duration` seconds, clamped to `[1, 4]`.
pub fn words_per_second(text: &str, duration: f64) -> f64 {
    let words = text.split_whitespace().count() as f64;
    (words / duration).clamp(1.0, 4.0)
}

/// Number of samples for a clip of `duration` seconds.
pub fn sample_count(sample_rate: u32, duration: f64) -> usize {
    (sample_rate as f64 * duration).round() as usize
}

/// Synthesizes mono samples in `[-1, 1]` for `text`.
///
/// The output holds exactly `round(sample_rate * estimate_duration(text))`
/// samples. All randomness comes from `rng`, so a seeded generator gives
/// reproducible output.
pub fn synthesize<R: Rng + ?Sized>(
    text: &str,
    voice: &VoiceCharacteristics,
    sample_rate: u32,
    rng: &mut R,
) -> Vec<f32> {
    let duration = estimate_duration(text);
    let wps = words_per_second(text, duration);
    let n = sample_count(sample_rate, duration);
    let f = voice.base_frequency;

    let mut samples = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / sample_rate as f64;
        let w = 2.0 * PI * f * t;

        let mut sample: f64 = HARMONICS
            .iter()
            .map(|(ratio, amplitude)| amplitude * (w * ratio).sin())
            .sum();
        sample += FORMANT_GAIN
            * (voice.resonance * (w * RESONANCE_RATIO).sin()
                + 0.5 * voice.brightness * (w * BRIGHTNESS_RATIO).sin());

        sample *= speech_envelope(t, duration, wps);
        sample += rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE);

        samples.push(sample.clamp(-1.0, 1.0) as f32);
    }
    samples
}

/// Procedural speech generator bound to one output sample rate.
#[derive(Debug, Clone, Copy)]
pub struct FormantGenerator {
    sample_rate: u32,
}

impl FormantGenerator {
    /// Default output rate.
    pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

    /// Creates a generator producing audio at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Returns the output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the mono float format of generated segments.
    pub fn format(&self) -> Format {
        Format::mono(self.sample_rate, SampleEncoding::Float32)
    }

    /// Synthesizes `text` into a mono float segment.
    pub fn synthesize_segment<R: Rng + ?Sized>(
        &self,
        text: &str,
        voice: &VoiceCharacteristics,
        rng: &mut R,
    ) -> AudioSegment {
        AudioSegment::new(self.format(), synthesize(text, voice, self.sample_rate, rng))
    }
}

impl Default for FormantGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SAMPLE_RATE)
    }
}
