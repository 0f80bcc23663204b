//! Contract with an external neural TTS runtime.
//!
//! Inference itself happens elsewhere; this module only describes the
//! tensor-in/tensor-out call and its collaborators (tokenizer, speaker
//! embeddings) so they can be injected into the gateway.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Error type for neural TTS operations.
#[derive(Debug, thiserror::Error)]
pub enum NeuralError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("tokenize failed: {0}")]
    Tokenize(String),
    #[error("embeddings: {0}")]
    Embeddings(String),
}

/// Static description of a loaded model, queried once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub sample_rate: u32,
}

/// A loaded neural TTS model.
///
/// Implementations must tolerate concurrent `run` calls or serialize them
/// internally; the gateway adds no locking of its own.
pub trait NeuralSession: Send + Sync {
    /// Returns the model description.
    fn model_info(&self) -> ModelInfo;

    /// Runs inference. Returns mono samples at `model_info().sample_rate`.
    /// May block for a long time; no timeout is applied.
    fn run(&self, tokens: &[i64], speaker_embedding: Option<&[f32]>) -> Result<Vec<f32>, NeuralError>;
}

/// Acquires a neural session. Called once, when the gateway is built.
pub trait ModelLoader {
    fn load(&self) -> Result<Arc<dyn NeuralSession>, NeuralError>;
}

impl<F> ModelLoader for F
where
    F: Fn() -> Result<Arc<dyn NeuralSession>, NeuralError>,
{
    fn load(&self) -> Result<Arc<dyn NeuralSession>, NeuralError> {
        self()
    }
}

/// Turns text into model token ids.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<i64>, NeuralError>;
}

/// Default tokenizer: one id per Unicode scalar value, framed by 0 on both
/// ends. Models with their own vocabulary supply a real tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteTokenizer;

impl Tokenizer for ByteTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<i64>, NeuralError> {
        let mut tokens = Vec::with_capacity(text.chars().count() + 2);
        tokens.push(0);
        tokens.extend(text.chars().map(|c| c as i64));
        tokens.push(0);
        Ok(tokens)
    }
}

/// Supplies optional speaker embeddings by voice id.
pub trait VoiceEmbeddings: Send + Sync {
    fn embedding(&self, voice_id: &str) -> Option<Vec<f32>>;
}

/// Speaker embeddings kept in memory, keyed by lowercase voice id.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    entries: HashMap<String, Vec<f32>>,
}

impl EmbeddingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the embedding for a voice.
    pub fn insert(&mut self, voice_id: &str, embedding: Vec<f32>) {
        self.entries.insert(voice_id.trim().to_lowercase(), embedding);
    }

    /// Returns the number of voices with an embedding.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no embeddings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a JSON object mapping voice ids to float arrays.
    pub fn from_json(content: &str) -> Result<Self, NeuralError> {
        let raw: HashMap<String, Vec<f32>> =
            serde_json::from_str(content).map_err(|e| NeuralError::Embeddings(e.to_string()))?;
        let mut table = Self::new();
        for (voice, embedding) in raw {
            table.insert(&voice, embedding);
        }
        Ok(table)
    }

    /// Loads a JSON embeddings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NeuralError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| NeuralError::Embeddings(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }
}

impl VoiceEmbeddings for EmbeddingTable {
    fn embedding(&self, voice_id: &str) -> Option<Vec<f32>> {
        self.entries.get(&voice_id.trim().to_lowercase()).cloned()
    }
}
