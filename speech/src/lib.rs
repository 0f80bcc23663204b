//! Text-to-speech for dialogue podcasts.
//!
//! This crate provides:
//! - [`Synthesizer`]: one utterance in, one WAV buffer out, never failing
//! - [`TtsGateway`]: neural inference with sticky procedural fallback
//! - [`Backend`]: the closed set of backends chosen from configuration
//! - [`NeuralSession`] and friends: the contract with an external model runtime
//! - [`Script`] and [`render_dialogue`]: turning a dialogue into one file
//!
//! # Example
//!
//! ```rust
//! use dialogcast_audio::Assembler;
//! use dialogcast_speech::{render_dialogue, ProceduralSynthesizer, Script, SynthesisOptions, Turn};
//!
//! let synth = ProceduralSynthesizer::new(SynthesisOptions::default().with_seed(7));
//! let script = Script::from_turns(vec![
//!     Turn::new("female_1", "Welcome to the show."),
//!     Turn::new("male_1", "Glad to be here."),
//! ]);
//! let podcast = render_dialogue(&synth, &script, &Assembler::default(), 1);
//! assert_eq!(&podcast[0..4], b"RIFF");
//! ```

mod dialogue;
mod neural;
mod tts;

pub use dialogue::*;
pub use neural::*;
pub use tts::*;

#[cfg(test)]
mod tests;
