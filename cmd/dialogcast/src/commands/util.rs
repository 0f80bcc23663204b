//! Utility functions for CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dialogcast_audio::pcm::SampleEncoding;
use dialogcast_audio::{Assembler, AssemblerOptions};
use dialogcast_cli::config::{load_config, Config, Profile};
use dialogcast_cli::{Output, OutputFormat};
use dialogcast_speech::{
    Backend, BackendKind, EmbeddingTable, ModelLoader, NeuralError, NeuralSession, SynthesisOptions, TtsGateway,
};
use tracing::warn;

use crate::Cli;

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref())
}

/// Gets the profile to use: the one named by `-p`, else the current one,
/// else built-in defaults.
pub fn get_profile(cli: &Cli) -> anyhow::Result<Profile> {
    let cfg = get_config(cli)?;
    Ok(cfg.resolve_profile(cli.profile.as_deref())?)
}

/// Requires input file to be provided.
pub fn require_input_file(cli: &Cli) -> anyhow::Result<&str> {
    cli.input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("input file is required, use -f flag"))
}

/// Requires output file to be provided.
pub fn require_output_file(cli: &Cli) -> anyhow::Result<&str> {
    cli.output
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("output file is required, use -o flag"))
}

/// Writes binary data to a file.
pub fn output_bytes(data: &[u8], output_path: &str) -> anyhow::Result<()> {
    Output::new(OutputFormat::Yaml, None).write_binary(data, output_path)
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(result: &T, cli: &Cli) -> anyhow::Result<()> {
    Output::new(OutputFormat::from_json_flag(cli.json), cli.output.clone()).write(result)
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    dialogcast_cli::print_verbose(cli.verbose, msg);
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}

/// Formats bytes to human readable string.
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Formats a duration as seconds with millisecond precision.
pub fn format_duration(d: Duration) -> String {
    format!("{:.3}s", d.as_secs_f64())
}

/// Parses an encoding name.
pub fn parse_encoding(name: &str) -> anyhow::Result<SampleEncoding> {
    match name.trim().to_lowercase().as_str() {
        "" | "pcm16" | "s16" | "l16" => Ok(SampleEncoding::Pcm16),
        "float32" | "f32" => Ok(SampleEncoding::Float32),
        other => anyhow::bail!("unknown encoding {:?} (expected pcm16 or float32)", other),
    }
}

/// Builds synthesis options from a profile.
pub fn synthesis_options(profile: &Profile) -> anyhow::Result<SynthesisOptions> {
    let mut options = SynthesisOptions::default()
        .with_encoding(parse_encoding(&profile.encoding)?)
        .with_seed(profile.seed);
    if profile.sample_rate > 0 {
        options = options.with_sample_rate(profile.sample_rate);
    }
    Ok(options)
}

/// Resolves the backend kind: command-line override first, then the profile.
pub fn backend_kind(profile: &Profile, flag: Option<BackendKind>) -> anyhow::Result<BackendKind> {
    if let Some(kind) = flag {
        return Ok(kind);
    }
    if profile.backend.is_empty() {
        return Ok(BackendKind::default());
    }
    profile.backend.parse().map_err(anyhow::Error::msg)
}

/// Builds the synthesis backend described by the profile.
pub fn build_backend(profile: &Profile, flag: Option<BackendKind>) -> anyhow::Result<Backend> {
    let options = synthesis_options(profile)?;
    let loader = ModelFileLoader::new(&profile.model_path);

    let kind = backend_kind(profile, flag)?;
    if kind != BackendKind::Neural {
        return Ok(Backend::from_kind(kind, options, &loader));
    }

    let mut builder = TtsGateway::builder(options);
    if !profile.embeddings_path.is_empty() {
        match EmbeddingTable::load(&profile.embeddings_path) {
            Ok(table) => builder = builder.embeddings(Arc::new(table)),
            Err(err) => warn!(error = %err, "ignoring speaker embeddings"),
        }
    }
    Ok(Backend::neural(builder, &loader))
}

/// Builds the assembler. `pad` overrides the profile's silence pad.
pub fn build_assembler(profile: &Profile, pad: Option<f64>) -> Assembler {
    let mut options = AssemblerOptions::default();
    if let Some(secs) = pad.or(profile.silence_pad) {
        options = options.with_silence_pad_secs(secs);
    }
    Assembler::new(options)
}

/// Worker count: command-line override, then the profile, then 1.
pub fn workers(profile: &Profile, flag: Option<usize>) -> usize {
    flag.or((profile.workers > 0).then_some(profile.workers)).unwrap_or(1).max(1)
}

/// Returns a warning when `backend` names the neural backend, which this
/// build cannot run.
pub fn neural_fallback_notice(backend: &str) -> Option<String> {
    let kind = backend.parse::<BackendKind>().ok()?;
    (kind == BackendKind::Neural).then(|| {
        "this build links no inference runtime; the neural backend always uses procedural synthesis".to_string()
    })
}

/// Locates a neural model on disk.
///
/// This build links no inference runtime, so an existing model file is
/// reported as unavailable too and the gateway runs in fallback mode.
pub struct ModelFileLoader {
    path: PathBuf,
}

impl ModelFileLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ModelLoader for ModelFileLoader {
    fn load(&self) -> Result<Arc<dyn NeuralSession>, NeuralError> {
        if self.path.as_os_str().is_empty() {
            return Err(NeuralError::ModelUnavailable("no model_path configured".into()));
        }
        if !self.path.is_file() {
            return Err(NeuralError::ModelUnavailable(format!("{}: not found", self.path.display())));
        }
        Err(NeuralError::ModelUnavailable(format!(
            "{}: no inference runtime in this build",
            self.path.display()
        )))
    }
}
