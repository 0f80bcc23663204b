//! Script rendering command.

use std::time::Instant;

use clap::Args;
use dialogcast_audio::codec::wav::WavHeader;
use dialogcast_speech::{BackendKind, Script, Synthesizer, render_dialogue};

use super::{
    build_assembler, build_backend, format_bytes, format_duration, get_profile, output_bytes, print_success,
    print_verbose, require_input_file, require_output_file, workers,
};
use crate::Cli;

/// Render a dialogue script into one podcast WAV file.
///
/// The script is YAML (or JSON, by extension):
///
///   title: Episode 1
///   voices:
///     Host: female_1
///     Guest: male_1
///   turns:
///     - speaker: Host
///       text: Welcome to the show.
///     - speaker: Guest
///       text: Thanks for having me.
///
/// Example:
///   dialogcast render -f episode.yaml -o episode.wav --workers 4
#[derive(Args)]
pub struct RenderCommand {
    /// Backend override: neural, procedural or silent
    #[arg(long)]
    backend: Option<BackendKind>,

    /// Silence between turns, in seconds
    #[arg(long)]
    pad: Option<f64>,

    /// Number of synthesis threads
    #[arg(long, short = 'w')]
    workers: Option<usize>,
}

impl RenderCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let input = require_input_file(cli)?;
        let output = require_output_file(cli)?;

        let script = Script::load(input)?;
        if script.turns.is_empty() {
            anyhow::bail!("script {} has no turns", input);
        }

        let profile = get_profile(cli)?;
        let backend = build_backend(&profile, self.backend)?;
        let assembler = build_assembler(&profile, self.pad);
        let workers = workers(&profile, self.workers);

        if let Some(title) = &script.title {
            print_verbose(cli, &format!("Title: {}", title));
        }
        print_verbose(cli, &format!("Turns: {}", script.turns.len()));
        print_verbose(cli, &format!("Backend: {} ({})", backend.kind(), backend.name()));
        print_verbose(cli, &format!("Workers: {}", workers));

        let started = Instant::now();
        let podcast = render_dialogue(&backend, &script, &assembler, workers);
        output_bytes(&podcast, output)?;

        let duration = WavHeader::parse(&podcast).map(|h| h.duration()).unwrap_or_default();
        print_verbose(cli, &format!("Rendered in {}", format_duration(started.elapsed())));
        print_success(&format!(
            "Podcast saved to {} ({} turns, {}, {})",
            output,
            script.turns.len(),
            format_bytes(podcast.len()),
            format_duration(duration)
        ));
        Ok(())
    }
}
