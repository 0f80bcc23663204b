//! Text-to-speech synthesis backends.
//!
//! Every backend turns `(text, voice)` into a complete WAV buffer and never
//! fails: errors degrade to procedurally synthesized audio.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::Arc;

use dialogcast_audio::codec::wav;
use dialogcast_audio::pcm::{AudioSegment, Format, SampleEncoding};
use dialogcast_audio::voice::{estimate_duration, resolve_voice, sample_count, FormantGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::neural::{ByteTokenizer, ModelInfo, ModelLoader, NeuralError, NeuralSession, Tokenizer, VoiceEmbeddings};

/// Interface for a text-to-speech synthesizer.
pub trait Synthesizer: Send + Sync {
    /// Returns a short backend name for logs.
    fn name(&self) -> &'static str;

    /// Synthesizes one utterance into a WAV buffer. Never fails.
    fn convert_to_speech(&self, text: &str, voice_id: &str) -> Vec<u8>;
}

/// Output settings shared by all backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Sample rate of procedurally generated audio.
    pub sample_rate: u32,
    /// Sample encoding of produced WAV buffers.
    pub encoding: SampleEncoding,
    /// Base seed for the procedural noise source.
    pub seed: u64,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            sample_rate: FormantGenerator::DEFAULT_SAMPLE_RATE,
            encoding: SampleEncoding::Pcm16,
            seed: 0,
        }
    }
}

impl SynthesisOptions {
    /// Sets the procedural sample rate. Zero selects the default rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self.normalized()
    }

    /// Sets the output encoding.
    pub fn with_encoding(mut self, encoding: SampleEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the noise seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces a zero sample rate, which no WAV reader accepts, with the
    /// default rate.
    fn normalized(mut self) -> Self {
        if self.sample_rate == 0 {
            self.sample_rate = FormantGenerator::DEFAULT_SAMPLE_RATE;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Procedural
// ---------------------------------------------------------------------------

/// Formant-based synthesizer. Output depends only on the options, the text
/// and the voice id.
#[derive(Debug, Clone)]
pub struct ProceduralSynthesizer {
    generator: FormantGenerator,
    options: SynthesisOptions,
}

impl ProceduralSynthesizer {
    /// Creates a procedural synthesizer.
    pub fn new(options: SynthesisOptions) -> Self {
        let options = options.normalized();
        Self {
            generator: FormantGenerator::new(options.sample_rate),
            options,
        }
    }

    /// Synthesizes one utterance as a mono float segment.
    pub fn synthesize(&self, text: &str, voice_id: &str) -> AudioSegment {
        let voice = resolve_voice(voice_id);
        let mut rng = StdRng::seed_from_u64(call_seed(self.options.seed, text, voice_id));
        self.generator.synthesize_segment(text, &voice, &mut rng)
    }
}

impl Synthesizer for ProceduralSynthesizer {
    fn name(&self) -> &'static str {
        "procedural"
    }

    fn convert_to_speech(&self, text: &str, voice_id: &str) -> Vec<u8> {
        let segment = self.synthesize(text, voice_id);
        encode(&segment, self.options.encoding)
    }
}

/// Derives an independent, reproducible seed for one call.
///
/// Uses 64-bit FNV-1a so seeds stay the same across builds and platforms.
fn call_seed(base: u64, text: &str, voice_id: &str) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    // 0xff never occurs in UTF-8, so it separates text from voice unambiguously.
    for byte in text.bytes().chain([0xff]).chain(voice_id.bytes()) {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    base ^ hash
}

fn encode(segment: &AudioSegment, encoding: SampleEncoding) -> Vec<u8> {
    let format = segment.format();
    wav::encode(segment.samples(), format.sample_rate, format.channels, encoding)
}

// ---------------------------------------------------------------------------
// Silent
// ---------------------------------------------------------------------------

/// Mock synthesizer producing silence of the estimated utterance length.
/// Useful to exercise the pipeline without synthesis cost.
#[derive(Debug, Clone)]
pub struct SilentSynthesizer {
    options: SynthesisOptions,
}

impl SilentSynthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        Self {
            options: options.normalized(),
        }
    }
}

impl Synthesizer for SilentSynthesizer {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn convert_to_speech(&self, text: &str, _voice_id: &str) -> Vec<u8> {
        let n = sample_count(self.options.sample_rate, estimate_duration(text));
        wav::encode(&vec![0.0; n], self.options.sample_rate, 1, self.options.encoding)
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Neural model plus the collaborators needed to drive it.
struct NeuralBackend {
    session: Arc<dyn NeuralSession>,
    info: ModelInfo,
    tokenizer: Arc<dyn Tokenizer>,
    embeddings: Option<Arc<dyn VoiceEmbeddings>>,
}

/// Whether the gateway can use the neural model. Fixed at construction.
enum Mode {
    NeuralReady(NeuralBackend),
    FallbackOnly,
}

/// Builder for [`TtsGateway`].
pub struct GatewayBuilder {
    options: SynthesisOptions,
    tokenizer: Arc<dyn Tokenizer>,
    embeddings: Option<Arc<dyn VoiceEmbeddings>>,
}

impl GatewayBuilder {
    /// Sets the tokenizer (default: [`ByteTokenizer`]).
    pub fn tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Sets the speaker embedding source.
    pub fn embeddings(mut self, embeddings: Arc<dyn VoiceEmbeddings>) -> Self {
        self.embeddings = Some(embeddings);
        self
    }

    /// Loads the model once and builds the gateway.
    ///
    /// A load failure is not an error: the gateway is built in fallback-only
    /// mode and stays that way.
    pub fn build(self, loader: &dyn ModelLoader) -> TtsGateway {
        let mode = match load_session(loader) {
            Ok((session, info)) => {
                info!(
                    model = %info.name,
                    version = %info.version,
                    sample_rate = info.sample_rate,
                    "tts: neural model ready"
                );
                Mode::NeuralReady(NeuralBackend {
                    session,
                    info,
                    tokenizer: self.tokenizer,
                    embeddings: self.embeddings,
                })
            }
            Err(err) => {
                info!(error = %err, "tts: neural model unavailable, using procedural synthesis");
                Mode::FallbackOnly
            }
        };

        TtsGateway {
            mode,
            fallback: ProceduralSynthesizer::new(self.options),
            encoding: self.options.encoding,
        }
    }

    /// Builds a gateway that never uses a neural model.
    pub fn build_fallback_only(self) -> TtsGateway {
        TtsGateway {
            mode: Mode::FallbackOnly,
            fallback: ProceduralSynthesizer::new(self.options),
            encoding: self.options.encoding,
        }
    }
}

fn load_session(loader: &dyn ModelLoader) -> Result<(Arc<dyn NeuralSession>, ModelInfo), NeuralError> {
    let load = || {
        let session = loader.load()?;
        let info = session.model_info();
        Ok::<_, NeuralError>((session, info))
    };
    let (session, info) = match panic::catch_unwind(AssertUnwindSafe(load)) {
        Ok(result) => result?,
        Err(_) => return Err(NeuralError::ModelUnavailable("model loader panicked".into())),
    };
    if info.sample_rate == 0 {
        return Err(NeuralError::ModelUnavailable(format!(
            "model {} reports a zero sample rate",
            info.name
        )));
    }
    Ok((session, info))
}

/// Chooses between neural inference and procedural fallback.
///
/// The neural model is acquired once, in [`GatewayBuilder::build`]. If that
/// fails the gateway is fallback-only for its whole lifetime. A failure during
/// a single call falls back for that call only.
///
/// After construction the gateway is read-only and may be shared across
/// threads.
pub struct TtsGateway {
    mode: Mode,
    fallback: ProceduralSynthesizer,
    encoding: SampleEncoding,
}

impl fmt::Debug for TtsGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtsGateway")
            .field("neural", &self.is_neural())
            .field("model", &self.model_info())
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl TtsGateway {
    /// Starts building a gateway.
    pub fn builder(options: SynthesisOptions) -> GatewayBuilder {
        GatewayBuilder {
            options,
            tokenizer: Arc::new(ByteTokenizer),
            embeddings: None,
        }
    }

    /// Returns true if the neural model was acquired at construction.
    pub fn is_neural(&self) -> bool {
        matches!(self.mode, Mode::NeuralReady(_))
    }

    /// Returns the neural model description, if one is loaded.
    pub fn model_info(&self) -> Option<&ModelInfo> {
        match &self.mode {
            Mode::NeuralReady(backend) => Some(&backend.info),
            Mode::FallbackOnly => None,
        }
    }

    fn neural_samples(&self, backend: &NeuralBackend, text: &str, voice_id: &str) -> Result<Vec<f32>, NeuralError> {
        let tokens = backend.tokenizer.tokenize(text)?;
        let embedding = backend.embeddings.as_ref().and_then(|e| e.embedding(voice_id));
        let samples = backend.session.run(&tokens, embedding.as_deref())?;

        if samples.is_empty() {
            return Err(NeuralError::Inference("model returned no samples".into()));
        }
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(NeuralError::Inference("model returned non-finite samples".into()));
        }
        Ok(samples)
    }

    fn try_neural(&self, backend: &NeuralBackend, text: &str, voice_id: &str) -> Result<Vec<u8>, NeuralError> {
        let samples = match panic::catch_unwind(AssertUnwindSafe(|| self.neural_samples(backend, text, voice_id))) {
            Ok(result) => result?,
            Err(_) => return Err(NeuralError::Inference("neural session panicked".into())),
        };
        let segment = AudioSegment::new(
            Format::mono(backend.info.sample_rate, SampleEncoding::Float32),
            samples,
        );
        Ok(encode(&segment, self.encoding))
    }
}

impl Synthesizer for TtsGateway {
    fn name(&self) -> &'static str {
        match self.mode {
            Mode::NeuralReady(_) => "neural",
            Mode::FallbackOnly => "procedural",
        }
    }

    fn convert_to_speech(&self, text: &str, voice_id: &str) -> Vec<u8> {
        if let Mode::NeuralReady(backend) = &self.mode {
            match self.try_neural(backend, text, voice_id) {
                Ok(wav) => return wav,
                Err(err) => {
                    warn!(voice = %voice_id, error = %err, "tts: neural synthesis failed, falling back");
                }
            }
        }
        debug!(voice = %voice_id, chars = text.chars().count(), "tts: procedural synthesis");
        self.fallback.convert_to_speech(text, voice_id)
    }
}

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

/// Which backend to build, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Neural model with procedural fallback.
    Neural,
    /// Procedural synthesis only.
    #[default]
    Procedural,
    /// Silence of the estimated length.
    Silent,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Neural => "neural",
            BackendKind::Procedural => "procedural",
            BackendKind::Silent => "silent",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neural" => Ok(BackendKind::Neural),
            "procedural" | "fallback" => Ok(BackendKind::Procedural),
            "silent" | "mock" => Ok(BackendKind::Silent),
            other => Err(format!("unknown backend {:?} (expected neural, procedural or silent)", other)),
        }
    }
}

/// The closed set of synthesis backends, chosen once at startup.
#[derive(Debug)]
pub enum Backend {
    Neural(TtsGateway),
    Procedural(ProceduralSynthesizer),
    Silent(SilentSynthesizer),
}

impl Backend {
    /// Builds the backend named by `kind`. The loader is only consulted for
    /// [`BackendKind::Neural`]; use [`Backend::neural`] to also supply a
    /// tokenizer or embeddings.
    pub fn from_kind(kind: BackendKind, options: SynthesisOptions, loader: &dyn ModelLoader) -> Self {
        match kind {
            BackendKind::Neural => Backend::neural(TtsGateway::builder(options), loader),
            BackendKind::Procedural => Backend::Procedural(ProceduralSynthesizer::new(options)),
            BackendKind::Silent => Backend::Silent(SilentSynthesizer::new(options)),
        }
    }

    /// Builds a neural backend from a configured gateway builder.
    pub fn neural(builder: GatewayBuilder, loader: &dyn ModelLoader) -> Self {
        Backend::Neural(builder.build(loader))
    }

    /// Returns the configured kind.
    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Neural(_) => BackendKind::Neural,
            Backend::Procedural(_) => BackendKind::Procedural,
            Backend::Silent(_) => BackendKind::Silent,
        }
    }
}

impl Synthesizer for Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Neural(s) => s.name(),
            Backend::Procedural(s) => s.name(),
            Backend::Silent(s) => s.name(),
        }
    }

    fn convert_to_speech(&self, text: &str, voice_id: &str) -> Vec<u8> {
        match self {
            Backend::Neural(s) => s.convert_to_speech(text, voice_id),
            Backend::Procedural(s) => s.convert_to_speech(text, voice_id),
            Backend::Silent(s) => s.convert_to_speech(text, voice_id),
        }
    }
}
