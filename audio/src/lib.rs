//! Audio synthesis and assembly for dialogue podcasts.
//!
//! This crate provides:
//!
//! - `pcm`: audio format model and in-memory segments
//! - `codec::wav`: the WAV container codec
//! - `voice`: procedural speech synthesis (voice table, envelope, formant generator)
//! - `assembler`: stitching per-utterance clips into one file
//!
//! # Example
//!
//! ```rust
//! use dialogcast_audio::codec::wav;
//! use dialogcast_audio::pcm::SampleEncoding;
//! use dialogcast_audio::voice::{resolve_voice, synthesize};
//! use dialogcast_audio::assembler::combine;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let clips: Vec<Vec<u8>> = [("Hi there.", "female_1"), ("Hello!", "male_1")]
//!     .iter()
//!     .map(|(text, voice)| {
//!         let samples = synthesize(text, &resolve_voice(voice), 16000, &mut rng);
//!         wav::encode(&samples, 16000, 1, SampleEncoding::Pcm16)
//!     })
//!     .collect();
//!
//! let podcast = combine(&clips, 0.5);
//! assert!(wav::is_wav(&podcast));
//! ```

pub mod assembler;
pub mod codec;
pub mod pcm;
pub mod voice;

pub use assembler::{Assembler, AssemblerOptions, AssemblyReport};
pub use codec::wav::WavError;
pub use pcm::{AudioSegment, Format, SampleEncoding};
