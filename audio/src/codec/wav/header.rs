//! WAV (RIFF/WAVE) header layout.

use std::time::Duration;

use super::error::WavError;
use crate::pcm::{Format, SampleEncoding};

/// Size of the canonical header written by [`super::encode`].
pub const HEADER_LEN: usize = 44;

/// Length of the PCM `fmt ` chunk body.
const FMT_CHUNK_LEN: u32 = 16;

const RIFF_MAGIC: &[u8; 4] = b"RIFF";
const WAVE_MAGIC: &[u8; 4] = b"WAVE";
const FMT_ID: &[u8; 4] = b"fmt ";
const DATA_ID: &[u8; 4] = b"data";

/// `WAVE_FORMAT_EXTENSIBLE`: the real format code lives in the subformat GUID.
const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Parsed header of a WAV buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    /// Stream format declared by the `fmt ` chunk.
    pub format: Format,
    /// Offset of the first sample byte.
    pub data_offset: usize,
    /// Number of sample bytes available, trimmed to whole frames.
    pub data_len: usize,
}

impl WavHeader {
    /// Parses the header of a WAV buffer.
    ///
    /// Subchunks are walked from offset 12, so files carrying extra chunks
    /// (`LIST`, `fact`, ...) ahead of `data` are accepted.
    pub fn parse(data: &[u8]) -> Result<Self, WavError> {
        if data.len() < HEADER_LEN {
            return Err(WavError::TooShort(data.len()));
        }
        if &data[0..4] != RIFF_MAGIC {
            return Err(WavError::MissingMarker("RIFF"));
        }
        if &data[8..12] != WAVE_MAGIC {
            return Err(WavError::MissingMarker("WAVE"));
        }

        let mut format = None;
        let mut pos = 12usize;

        while pos + 8 <= data.len() {
            let id = &data[pos..pos + 4];
            let size = read_u32(data, pos + 4) as usize;
            let body = pos + 8;

            if id == FMT_ID {
                format = Some(parse_fmt(data, body, size)?);
            } else if id == DATA_ID {
                let format = format.ok_or(WavError::MissingChunk("fmt "))?;
                let available = size.min(data.len() - body);
                let data_len = available - available % format.block_align();
                return Ok(Self {
                    format,
                    data_offset: body,
                    data_len,
                });
            }

            // Chunks are word-aligned.
            pos = match body.checked_add(size).and_then(|end| end.checked_add(size & 1)) {
                Some(next) => next,
                None => break,
            };
        }

        match format {
            Some(_) => Err(WavError::MissingChunk("data")),
            None => Err(WavError::MissingChunk("fmt ")),
        }
    }

    /// Returns the number of interleaved samples in the data chunk.
    pub fn sample_count(&self) -> usize {
        self.data_len / self.format.bytes_per_sample()
    }

    /// Returns the playback duration of the data chunk.
    pub fn duration(&self) -> Duration {
        self.format.duration(self.data_len as u64)
    }

    /// Appends the canonical 44-byte header for `data_len` sample bytes.
    pub(crate) fn write(format: Format, data_len: usize, out: &mut Vec<u8>) {
        let data_len = u32::try_from(data_len).unwrap_or(u32::MAX);
        let riff_len = data_len.saturating_add(HEADER_LEN as u32 - 8);
        let byte_rate = u32::try_from(format.bytes_rate()).unwrap_or(u32::MAX);
        let block_align = u16::try_from(format.block_align()).unwrap_or(u16::MAX);

        out.extend_from_slice(RIFF_MAGIC);
        out.extend_from_slice(&riff_len.to_le_bytes());
        out.extend_from_slice(WAVE_MAGIC);

        out.extend_from_slice(FMT_ID);
        out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        out.extend_from_slice(&format.encoding.format_code().to_le_bytes());
        out.extend_from_slice(&format.channels.to_le_bytes());
        out.extend_from_slice(&format.sample_rate.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&format.depth().to_le_bytes());

        out.extend_from_slice(DATA_ID);
        out.extend_from_slice(&data_len.to_le_bytes());
    }
}

fn parse_fmt(data: &[u8], body: usize, size: usize) -> Result<Format, WavError> {
    if size < FMT_CHUNK_LEN as usize || body + FMT_CHUNK_LEN as usize > data.len() {
        return Err(WavError::InvalidFormat("fmt chunk truncated".into()));
    }

    let mut format_code = read_u16(data, body);
    let channels = read_u16(data, body + 2);
    let sample_rate = read_u32(data, body + 4);
    let bits = read_u16(data, body + 14);

    if format_code == FORMAT_EXTENSIBLE {
        // cbSize(2) validBits(2) channelMask(4) then the GUID, whose first two
        // bytes are the effective format code.
        if size < 40 || body + 26 > data.len() {
            return Err(WavError::InvalidFormat("extensible fmt chunk truncated".into()));
        }
        format_code = read_u16(data, body + 24);
    }

    if channels == 0 {
        return Err(WavError::InvalidFormat("zero channels".into()));
    }
    if sample_rate == 0 {
        return Err(WavError::InvalidFormat("zero sample rate".into()));
    }

    let encoding = SampleEncoding::from_wav(format_code, bits)
        .ok_or(WavError::Unsupported { format_code, bits })?;

    Ok(Format::new(sample_rate, channels, encoding))
}

#[inline]
fn read_u16(data: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([data[off], data[off + 1]])
}

#[inline]
fn read_u32(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}
