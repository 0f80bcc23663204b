//! dialogcast - turn dialogue scripts into podcast audio.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CombineCommand, ConfigCommand, InfoCommand, RenderCommand, SynthCommand, VoicesCommand};

/// dialogcast - synthesize dialogue scripts into a single WAV file.
///
/// Each line of a script is spoken by a voice (neural model when available,
/// procedural synthesis otherwise) and the clips are joined with silence.
///
/// Configuration is stored in ~/.dialogcast/ and supports multiple profiles,
/// similar to kubectl's context management.
#[derive(Parser)]
#[command(name = "dialogcast")]
#[command(about = "Dialogue-to-podcast audio synthesis tool")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.dialogcast/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Profile name to use
    #[arg(short = 'p', long, global = true)]
    pub profile: Option<String>,

    /// Output file (default: stdout for text output)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Input script file (YAML or JSON)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize one utterance
    Synth(SynthCommand),
    /// Render a dialogue script into one podcast file
    Render(RenderCommand),
    /// Join existing WAV files with silence between them
    Combine(CombineCommand),
    /// Show the header of a WAV file
    Info(InfoCommand),
    /// List built-in voices
    Voices(VoicesCommand),
    /// Manage CLI configuration
    Config(ConfigCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Synth(cmd) => cmd.run(&cli),
        Commands::Render(cmd) => cmd.run(&cli),
        Commands::Combine(cmd) => cmd.run(&cli),
        Commands::Info(cmd) => cmd.run(&cli),
        Commands::Voices(cmd) => cmd.run(&cli),
        Commands::Config(cmd) => cmd.run(&cli),
    }
}
