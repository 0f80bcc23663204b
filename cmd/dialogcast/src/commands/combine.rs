//! WAV assembly command.

use clap::Args;

use super::{build_assembler, format_bytes, format_duration, get_profile, output_bytes, print_success, print_warning, require_output_file};
use crate::Cli;

/// Join existing WAV files, in order, with silence between them.
///
/// Inputs may differ in sample rate, channel count and encoding; the output
/// is 44.1 kHz stereo float. Files that fail to decode are skipped.
///
/// Example:
///   dialogcast combine intro.wav part1.wav part2.wav -o show.wav --pad 0.75
#[derive(Args)]
pub struct CombineCommand {
    /// WAV files to join
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Silence between files, in seconds
    #[arg(long)]
    pad: Option<f64>,
}

impl CombineCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let output = require_output_file(cli)?;

        let clips = self
            .inputs
            .iter()
            .map(|path| std::fs::read(path).map_err(|e| anyhow::anyhow!("{}: {}", path, e)))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let profile = get_profile(cli)?;
        let assembler = build_assembler(&profile, self.pad);
        let (combined, report) = assembler.combine_with_report(&clips);
        output_bytes(&combined, output)?;

        if report.skipped > 0 {
            print_warning(&format!("{} of {} inputs could not be decoded", report.skipped, clips.len()));
        }
        if report.fallback {
            print_warning("no input decoded, wrote the first file unchanged");
        }
        print_success(&format!(
            "Combined {} files into {} ({}, {})",
            clips.len(),
            output,
            format_bytes(combined.len()),
            format_duration(report.duration)
        ));
        Ok(())
    }
}
