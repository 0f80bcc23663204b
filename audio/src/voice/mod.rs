//! Procedural voice synthesis.
//!
//! Used when no neural model is available. Everything here is a pure
//! function of its inputs plus an injected random source.
//!
//! # Example
//!
//! ```rust
//! use dialogcast_audio::voice::{resolve_voice, FormantGenerator};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let generator = FormantGenerator::new(16000);
//! let mut rng = StdRng::seed_from_u64(7);
//! let clip = generator.synthesize_segment("Hello world.", &resolve_voice("male_1"), &mut rng);
//! assert_eq!(clip.frames(), 32000);
//! ```

mod envelope;
mod formant;
mod profile;

pub use envelope::*;
pub use formant::*;
pub use profile::*;
