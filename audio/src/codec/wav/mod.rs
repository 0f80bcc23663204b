//! WAV container codec.
//!
//! [`encode`] always writes the canonical 44-byte header (`RIFF`, `fmt `,
//! `data`, no extension chunks) followed by interleaved little-endian samples.
//! [`decode`] accepts that layout plus files with extra chunks.
//!
//! Round trips are exact for [`SampleEncoding::Float32`] and within one LSB
//! for [`SampleEncoding::Pcm16`].

mod error;
mod header;

pub use error::WavError;
pub use header::{WavHeader, HEADER_LEN};

use crate::pcm::{AudioSegment, Format, SampleEncoding};

/// Encodes interleaved samples into a WAV buffer.
///
/// For `Pcm16`, NaN and infinities become 0 and everything else is clamped to
/// `[-1, 1]` and scaled by 32767 with rounding. `Float32` samples are written
/// bit-for-bit.
///
/// A partial trailing frame is completed with zero samples, so the data
/// chunk always holds whole frames.
pub fn encode(samples: &[f32], sample_rate: u32, channels: u16, encoding: SampleEncoding) -> Vec<u8> {
    let format = Format::new(sample_rate, channels, encoding);
    let partial = samples.len() % channels.max(1) as usize;
    let padding = if partial == 0 { 0 } else { channels as usize - partial };
    let data_len = (samples.len() + padding) * encoding.bytes();

    let mut out = Vec::with_capacity(HEADER_LEN + data_len);
    WavHeader::write(format, data_len, &mut out);

    match encoding {
        SampleEncoding::Pcm16 => {
            for &s in samples {
                out.extend_from_slice(&f32_to_i16(s).to_le_bytes());
            }
        }
        SampleEncoding::Float32 => {
            for &s in samples {
                out.extend_from_slice(&s.to_le_bytes());
            }
        }
    }
    out.resize(HEADER_LEN + data_len, 0);
    out
}

/// Encodes a segment in its own format.
pub fn encode_segment(segment: &AudioSegment) -> Vec<u8> {
    let format = segment.format();
    encode(segment.samples(), format.sample_rate, format.channels, format.encoding)
}

/// Decodes a WAV buffer into a segment.
pub fn decode(data: &[u8]) -> Result<AudioSegment, WavError> {
    let header = WavHeader::parse(data)?;
    let body = &data[header.data_offset..header.data_offset + header.data_len];

    let samples = match header.format.encoding {
        SampleEncoding::Pcm16 => body
            .chunks_exact(2)
            .map(|b| i16_to_f32(i16::from_le_bytes([b[0], b[1]])))
            .collect(),
        SampleEncoding::Float32 => body
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
    };

    Ok(AudioSegment::new(header.format, samples))
}

/// Returns true if `data` starts with the `RIFF`/`WAVE` markers.
pub fn is_wav(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE"
}

#[inline]
fn f32_to_i16(s: f32) -> i16 {
    if !s.is_finite() {
        return 0;
    }
    (s.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

#[inline]
fn i16_to_f32(s: i16) -> f32 {
    (s as f32 / 32767.0).max(-1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSB: f32 = 1.0 / 32767.0;

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| (i as f32 / n as f32) * 2.0 - 1.0).collect()
    }

    #[test]
    fn test_encode_length_and_markers() {
        let samples = ramp(100);
        for encoding in [SampleEncoding::Pcm16, SampleEncoding::Float32] {
            let wav = encode(&samples, 16000, 1, encoding);
            assert_eq!(wav.len(), HEADER_LEN + samples.len() * encoding.bytes());
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert!(is_wav(&wav));
        }
    }

    #[test]
    fn test_float32_roundtrip_exact() {
        let samples = vec![0.0, 1.0, -1.0, 0.123_456_79, -0.987_654_3, 1e-9, f32::MIN_POSITIVE, 0.5];
        for (rate, channels) in [(8000, 1), (44100, 2), (48000, 4)] {
            let wav = encode(&samples, rate, channels, SampleEncoding::Float32);
            let seg = decode(&wav).unwrap();
            assert_eq!(seg.format(), Format::new(rate, channels, SampleEncoding::Float32));
            assert_eq!(seg.samples(), samples.as_slice());
        }
    }

    #[test]
    fn test_pcm16_roundtrip_within_one_lsb() {
        let samples = ramp(1000);
        let seg = decode(&encode(&samples, 22050, 2, SampleEncoding::Pcm16)).unwrap();
        assert_eq!(seg.format(), Format::new(22050, 2, SampleEncoding::Pcm16));
        assert_eq!(seg.samples().len(), samples.len());
        for (a, b) in samples.iter().zip(seg.samples()) {
            assert!((a - b).abs() <= LSB, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_pcm16_scaling() {
        let wav = encode(&[1.0, -1.0, 0.5, 2.0, -3.0], 16000, 1, SampleEncoding::Pcm16);
        let body = &wav[HEADER_LEN..];
        let ints: Vec<i16> = body
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(ints, vec![32767, -32767, 16384, 32767, -32767]);
    }

    #[test]
    fn test_pcm16_non_finite_becomes_zero() {
        let wav = encode(&[f32::NAN, f32::INFINITY, f32::NEG_INFINITY], 16000, 1, SampleEncoding::Pcm16);
        assert!(wav[HEADER_LEN..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_empty() {
        let wav = encode(&[], 44100, 2, SampleEncoding::Float32);
        assert_eq!(wav.len(), HEADER_LEN);
        let seg = decode(&wav).unwrap();
        assert!(seg.is_empty());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode(b"not a wav"), Err(WavError::TooShort(9)));
        assert_eq!(decode(&[0u8; 64]), Err(WavError::MissingMarker("RIFF")));
    }

    #[test]
    fn test_partial_frame_is_zero_padded() {
        for encoding in [SampleEncoding::Pcm16, SampleEncoding::Float32] {
            let wav = encode(&[0.5, -0.5, 0.25], 8000, 2, encoding);
            let header = WavHeader::parse(&wav).unwrap();
            assert_eq!(header.data_len, 4 * encoding.bytes());
            assert_eq!(wav.len(), HEADER_LEN + header.data_len);

            let seg = decode(&wav).unwrap();
            assert_eq!(seg.frames(), 2);
            assert_eq!(seg.samples().len(), 4);
            assert!((seg.samples()[2] - 0.25).abs() <= LSB);
            assert_eq!(seg.samples()[3], 0.0);
        }
    }

    #[test]
    fn test_encode_segment_uses_segment_format() {
        let seg = AudioSegment::new(Format::STEREO_44K_F32, vec![0.25, -0.25]);
        let back = decode(&encode_segment(&seg)).unwrap();
        assert_eq!(back, seg);
    }
}
