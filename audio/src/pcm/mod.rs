//! PCM (Pulse Code Modulation) audio format handling.
//!
//! # Key Types
//!
//! - [`Format`]: Audio format (sample rate, channels, sample encoding)
//! - [`SampleEncoding`]: 16-bit integer or 32-bit float samples
//! - [`AudioSegment`]: A decoded clip with naive format coercion
//!
//! # Example
//!
//! ```rust
//! use dialogcast_audio::pcm::{AudioSegment, Format};
//! use std::time::Duration;
//!
//! let pad = AudioSegment::silence(Format::STEREO_44K_F32, Duration::from_millis(500));
//! assert_eq!(pad.frames(), 22050);
//! ```

mod format;
mod segment;

pub use format::{Format, SampleEncoding};
pub use segment::AudioSegment;
