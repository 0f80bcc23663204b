//! Single-utterance synthesis command.

use clap::Args;
use dialogcast_audio::codec::wav::WavHeader;
use dialogcast_speech::{BackendKind, Synthesizer};

use super::{build_backend, format_bytes, format_duration, get_profile, output_bytes, print_success, print_verbose, require_output_file};
use crate::Cli;

/// Synthesize one utterance into a WAV file.
///
/// Examples:
///   dialogcast synth --voice female_1 "Hello and welcome." -o hello.wav
///   dialogcast synth --backend silent --text "Timing check." -o check.wav
#[derive(Args)]
pub struct SynthCommand {
    /// Text to speak
    #[arg(long, short = 't')]
    text: Option<String>,

    /// Text to speak (positional form)
    #[arg(conflicts_with = "text")]
    words: Vec<String>,

    /// Voice id (female_1, female_2, male_1, male_2; anything else sounds neutral)
    #[arg(long, default_value = "female_1")]
    voice: String,

    /// Backend override: neural, procedural or silent
    #[arg(long)]
    backend: Option<BackendKind>,
}

impl SynthCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let output = require_output_file(cli)?;
        let text = match &self.text {
            Some(text) => text.clone(),
            None => self.words.join(" "),
        };

        let profile = get_profile(cli)?;
        let backend = build_backend(&profile, self.backend)?;
        print_verbose(cli, &format!("Backend: {} ({})", backend.kind(), backend.name()));
        print_verbose(cli, &format!("Voice: {}", self.voice));

        let wav = backend.convert_to_speech(&text, &self.voice);
        output_bytes(&wav, output)?;

        let duration = WavHeader::parse(&wav).map(|h| h.duration()).unwrap_or_default();
        print_success(&format!(
            "Audio saved to {} ({}, {})",
            output,
            format_bytes(wav.len()),
            format_duration(duration)
        ));
        Ok(())
    }
}
