//! Dialogue scripts and their rendering into one podcast file.

use std::collections::HashMap;
use std::path::Path;
use std::thread;

use dialogcast_audio::assembler::Assembler;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::tts::Synthesizer;

/// Error type for script loading.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One spoken line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Speaker name or voice id.
    pub speaker: String,
    /// Text to speak.
    pub text: String,
}

impl Turn {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// An ordered dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Speaker name → voice id. Speakers not listed use their name as voice id.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub voices: HashMap<String, String>,

    #[serde(default)]
    pub turns: Vec<Turn>,
}

impl Script {
    /// Creates a script from turns.
    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self {
            turns,
            ..Default::default()
        }
    }

    /// Parses a YAML script.
    pub fn from_yaml_str(content: &str) -> Result<Self, ScriptError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parses a JSON script.
    pub fn from_json_str(content: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads a script; `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Returns the voice id for a speaker.
    pub fn voice_for<'a>(&'a self, speaker: &'a str) -> &'a str {
        self.voices.get(speaker).map(String::as_str).unwrap_or(speaker)
    }

    /// Returns `(text, voice id)` pairs in order.
    pub fn lines(&self) -> Vec<(&str, &str)> {
        self.turns
            .iter()
            .map(|t| (t.text.as_str(), self.voice_for(&t.speaker)))
            .collect()
    }
}

/// Synthesizes every line, in order, one WAV buffer per line.
///
/// With `workers > 1` lines are split across scoped threads; the result is
/// identical to the sequential path.
pub fn synthesize_lines(synth: &dyn Synthesizer, lines: &[(&str, &str)], workers: usize) -> Vec<Vec<u8>> {
    let workers = workers.clamp(1, lines.len().max(1));
    if workers == 1 {
        return lines
            .iter()
            .map(|(text, voice)| synth.convert_to_speech(text, voice))
            .collect();
    }

    let chunk = lines.len().div_ceil(workers);
    debug!(lines = lines.len(), workers, "dialogue: synthesizing in parallel");

    thread::scope(|s| {
        let handles: Vec<_> = lines
            .chunks(chunk)
            .map(|part| {
                let handle = s.spawn(move || {
                    part.iter()
                        .map(|(text, voice)| synth.convert_to_speech(text, voice))
                        .collect::<Vec<_>>()
                });
                (part, handle)
            })
            .collect();

        let mut out = Vec::with_capacity(lines.len());
        for (part, handle) in handles {
            match handle.join() {
                Ok(clips) => out.extend(clips),
                Err(_) => {
                    warn!(lines = part.len(), "dialogue: worker panicked, retrying sequentially");
                    out.extend(part.iter().map(|(text, voice)| synth.convert_to_speech(text, voice)));
                }
            }
        }
        out
    })
}

/// Renders a whole script: one clip per turn, then one assembly pass.
pub fn render_dialogue(synth: &dyn Synthesizer, script: &Script, assembler: &Assembler, workers: usize) -> Vec<u8> {
    let lines = script.lines();
    let clips = synthesize_lines(synth, &lines, workers);
    let (podcast, report) = assembler.combine_with_report(&clips);
    debug!(
        backend = synth.name(),
        turns = lines.len(),
        retained = report.retained,
        skipped = report.skipped,
        "dialogue: rendered"
    );
    podcast
}
