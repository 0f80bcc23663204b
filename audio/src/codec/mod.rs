//! Audio codec implementations.
//!
//! - `wav`: RIFF/WAVE container with 16-bit PCM or 32-bit float samples

pub mod wav;
