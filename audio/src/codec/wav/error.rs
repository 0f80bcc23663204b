use thiserror::Error;

/// Errors returned when a buffer is not a WAV container this codec can read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WavError {
    #[error("wav: buffer too short ({0} bytes, need at least 44)")]
    TooShort(usize),

    #[error("wav: missing {0:?} marker")]
    MissingMarker(&'static str),

    #[error("wav: missing {0:?} chunk")]
    MissingChunk(&'static str),

    #[error("wav: unsupported sample format (code {format_code}, {bits} bits)")]
    Unsupported { format_code: u16, bits: u16 },

    #[error("wav: invalid format: {0}")]
    InvalidFormat(String),
}
