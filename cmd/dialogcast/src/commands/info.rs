//! WAV header inspection command.

use clap::Args;
use dialogcast_audio::codec::wav::WavHeader;
use dialogcast_audio::pcm::SampleEncoding;
use serde::Serialize;

use super::output_result;
use crate::Cli;

/// Show the header of a WAV file.
#[derive(Args)]
pub struct InfoCommand {
    /// WAV file
    file: String,
}

#[derive(Debug, Serialize)]
struct WavInfo {
    file: String,
    sample_rate: u32,
    channels: u16,
    encoding: &'static str,
    bits_per_sample: u16,
    frames: usize,
    duration_seconds: f64,
    data_bytes: usize,
}

impl InfoCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let data = std::fs::read(&self.file)?;
        let header = WavHeader::parse(&data).map_err(|e| anyhow::anyhow!("{}: {}", self.file, e))?;

        let format = header.format;
        let info = WavInfo {
            file: self.file.clone(),
            sample_rate: format.sample_rate,
            channels: format.channels,
            encoding: match format.encoding {
                SampleEncoding::Pcm16 => "pcm16",
                SampleEncoding::Float32 => "float32",
            },
            bits_per_sample: format.depth(),
            frames: format.frames(header.sample_count()),
            duration_seconds: header.duration().as_secs_f64(),
            data_bytes: header.data_len,
        };
        output_result(&info, cli)
    }
}
