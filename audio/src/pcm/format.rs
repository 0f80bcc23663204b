//! PCM audio format definitions.

use std::time::Duration;

/// Sample encoding of interleaved PCM data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleEncoding {
    /// Signed 16-bit little-endian integers (WAV format code 1).
    Pcm16,
    /// IEEE 754 32-bit little-endian floats (WAV format code 3).
    Float32,
}

impl SampleEncoding {
    /// Returns the WAV `fmt ` format code for this encoding.
    pub const fn format_code(&self) -> u16 {
        match self {
            SampleEncoding::Pcm16 => 1,
            SampleEncoding::Float32 => 3,
        }
    }

    /// Returns the number of bits per sample.
    pub const fn bits(&self) -> u16 {
        match self {
            SampleEncoding::Pcm16 => 16,
            SampleEncoding::Float32 => 32,
        }
    }

    /// Returns the number of bytes per sample.
    pub const fn bytes(&self) -> usize {
        self.bits() as usize / 8
    }

    /// Maps a WAV format code and bit depth back to an encoding.
    pub fn from_wav(format_code: u16, bits: u16) -> Option<Self> {
        match (format_code, bits) {
            (1, 16) => Some(SampleEncoding::Pcm16),
            (3, 32) => Some(SampleEncoding::Float32),
            _ => None,
        }
    }
}

/// Describes an audio stream: sample rate, channel count and sample encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    /// Sample rate in Hz (e.g., 16000, 44100).
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
    /// Encoding of each sample.
    pub encoding: SampleEncoding,
}

impl Format {
    /// Creates a new format.
    pub const fn new(sample_rate: u32, channels: u16, encoding: SampleEncoding) -> Self {
        Self {
            sample_rate,
            channels,
            encoding,
        }
    }

    /// Creates a mono format.
    pub const fn mono(sample_rate: u32, encoding: SampleEncoding) -> Self {
        Self::new(sample_rate, 1, encoding)
    }

    /// Creates a stereo format.
    pub const fn stereo(sample_rate: u32, encoding: SampleEncoding) -> Self {
        Self::new(sample_rate, 2, encoding)
    }

    /// Returns the sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the number of channels.
    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Returns the bit depth of a single sample.
    #[inline]
    pub fn depth(&self) -> u16 {
        self.encoding.bits()
    }

    /// Returns the number of bytes in one sample.
    #[inline]
    pub fn bytes_per_sample(&self) -> usize {
        self.encoding.bytes()
    }

    /// Returns the number of bytes in one frame (one sample per channel).
    #[inline]
    pub fn block_align(&self) -> usize {
        self.bytes_per_sample() * self.channels as usize
    }

    /// Returns the number of bytes per second.
    pub fn bytes_rate(&self) -> u64 {
        self.sample_rate as u64 * self.block_align() as u64
    }

    /// Returns the number of bytes needed to hold the given duration.
    /// The result is always a whole number of frames.
    pub fn bytes_in_duration(&self, duration: Duration) -> u64 {
        self.frames_in_duration(duration) as u64 * self.block_align() as u64
    }

    /// Returns the number of whole frames in the given duration.
    pub fn frames_in_duration(&self, duration: Duration) -> usize {
        (duration.as_secs_f64() * self.sample_rate as f64).round() as usize
    }

    /// Returns the playback duration of `bytes` bytes of audio.
    pub fn duration(&self, bytes: u64) -> Duration {
        let rate = self.bytes_rate();
        if rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(bytes as f64 / rate as f64)
    }

    /// Returns the number of frames represented by `samples` interleaved samples.
    pub fn frames(&self, samples: usize) -> usize {
        if self.channels == 0 {
            return 0;
        }
        samples / self.channels as usize
    }
}

// Common format presets
impl Format {
    /// 16kHz mono, 16-bit
    pub const MONO_16K_L16: Format = Format::mono(16000, SampleEncoding::Pcm16);
    /// 24kHz mono, 32-bit float (typical neural TTS output)
    pub const MONO_24K_F32: Format = Format::mono(24000, SampleEncoding::Float32);
    /// 44.1kHz mono, 32-bit float
    pub const MONO_44K_F32: Format = Format::mono(44100, SampleEncoding::Float32);
    /// 44.1kHz stereo, 32-bit float. Target format of clip assembly.
    pub const STEREO_44K_F32: Format = Format::stereo(44100, SampleEncoding::Float32);
}
