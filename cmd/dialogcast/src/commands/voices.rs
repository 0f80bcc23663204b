//! Voice listing command.

use clap::Args;
use dialogcast_audio::voice::{ALL_VOICES, NEUTRAL_VOICE};
use serde::Serialize;

use super::output_result;
use crate::Cli;

/// List built-in voices.
///
/// Any other voice id is accepted and uses the neutral voice.
#[derive(Args)]
pub struct VoicesCommand {}

#[derive(Debug, Serialize)]
struct VoiceRow {
    id: &'static str,
    base_frequency: f64,
    resonance: f64,
    brightness: f64,
}

impl VoicesCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let rows: Vec<VoiceRow> = ALL_VOICES
            .iter()
            .map(|v| VoiceRow {
                id: v.id,
                base_frequency: v.characteristics.base_frequency,
                resonance: v.characteristics.resonance,
                brightness: v.characteristics.brightness,
            })
            .collect();

        if cli.json || cli.output.is_some() {
            return output_result(&rows, cli);
        }

        println!("{:<12} {:>10} {:>10} {:>10}", "ID", "F0 (Hz)", "RESONANCE", "BRIGHTNESS");
        for row in &rows {
            println!(
                "{:<12} {:>10.1} {:>10.2} {:>10.2}",
                row.id, row.base_frequency, row.resonance, row.brightness
            );
        }
        println!(
            "{:<12} {:>10.1} {:>10.2} {:>10.2}",
            "(other)", NEUTRAL_VOICE.base_frequency, NEUTRAL_VOICE.resonance, NEUTRAL_VOICE.brightness
        );
        Ok(())
    }
}
