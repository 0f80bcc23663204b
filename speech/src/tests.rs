//! Integration tests for the speech crate.

use super::*;
use dialogcast_audio::codec::wav::{self, WavHeader};
use dialogcast_audio::pcm::{Format, SampleEncoding};
use dialogcast_audio::voice::estimate_duration;
use dialogcast_audio::{Assembler, AssemblerOptions};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

// ============================================================================
// Mock Implementations
// ============================================================================

const MODEL_RATE: u32 = 22050;
const SAMPLES_PER_TOKEN: usize = 100;

#[derive(Default)]
struct MockSession {
    calls: AtomicUsize,
    embeddings_seen: Mutex<Vec<Option<Vec<f32>>>>,
}

impl NeuralSession for MockSession {
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: "mock-tts".to_string(),
            version: "1.0".to_string(),
            sample_rate: MODEL_RATE,
        }
    }

    fn run(&self, tokens: &[i64], speaker_embedding: Option<&[f32]>) -> Result<Vec<f32>, NeuralError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.embeddings_seen
            .lock()
            .unwrap()
            .push(speaker_embedding.map(|e| e.to_vec()));

        // text "FAIL" (plus BOS/EOS) triggers an error
        if tokens.len() == 6 && tokens[1..5] == ['F' as i64, 'A' as i64, 'I' as i64, 'L' as i64] {
            return Err(NeuralError::Inference("boom".to_string()));
        }
        if tokens.len() == 2 {
            return Ok(Vec::new());
        }
        if tokens.contains(&('~' as i64)) {
            return Ok(vec![f32::NAN; 10]);
        }
        if tokens.contains(&('!' as i64)) {
            panic!("session exploded");
        }
        Ok((0..tokens.len() * SAMPLES_PER_TOKEN)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect())
    }
}

struct CountingLoader {
    loads: AtomicUsize,
    session: Option<Arc<MockSession>>,
}

impl CountingLoader {
    fn failing() -> Self {
        Self {
            loads: AtomicUsize::new(0),
            session: None,
        }
    }

    fn with(session: Arc<MockSession>) -> Self {
        Self {
            loads: AtomicUsize::new(0),
            session: Some(session),
        }
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelLoader for CountingLoader {
    fn load(&self) -> Result<Arc<dyn NeuralSession>, NeuralError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.session {
            Some(s) => Ok(s.clone()),
            None => Err(NeuralError::ModelUnavailable("model.onnx: no such file".to_string())),
        }
    }
}

fn assert_valid_wav(data: &[u8]) -> WavHeader {
    assert!(data.len() >= wav::HEADER_LEN);
    assert_eq!(&data[0..4], b"RIFF");
    assert_eq!(&data[8..12], b"WAVE");
    wav::decode(data).unwrap();
    WavHeader::parse(data).unwrap()
}

fn options() -> SynthesisOptions {
    SynthesisOptions::default().with_sample_rate(16000).with_seed(5)
}

// ============================================================================
// Gateway State
// ============================================================================

#[test]
fn test_missing_model_is_sticky_fallback() {
    let loader = CountingLoader::failing();
    let gateway = TtsGateway::builder(options()).build(&loader);

    assert!(!gateway.is_neural());
    assert!(gateway.model_info().is_none());
    assert_eq!(gateway.name(), "procedural");

    for _ in 0..3 {
        let header = assert_valid_wav(&gateway.convert_to_speech("Hello world.", "female_1"));
        assert_eq!(header.format.sample_rate, 16000);
        assert_eq!(header.sample_count(), 32000);
    }
    // loading is never retried
    assert_eq!(loader.loads(), 1);
}

#[test]
fn test_fallback_matches_procedural() {
    let gateway = TtsGateway::builder(options()).build(&CountingLoader::failing());
    let procedural = ProceduralSynthesizer::new(options());
    assert_eq!(
        gateway.convert_to_speech("Same input.", "male_1"),
        procedural.convert_to_speech("Same input.", "male_1")
    );
}

#[test]
fn test_panicking_loader_falls_back() {
    let loader = || -> Result<Arc<dyn NeuralSession>, NeuralError> { panic!("corrupt model") };
    let gateway = TtsGateway::builder(options()).build(&loader);
    assert!(!gateway.is_neural());
    assert_valid_wav(&gateway.convert_to_speech("Still speaks.", "male_2"));
}

#[test]
fn test_neural_ready() {
    let session = Arc::new(MockSession::default());
    let loader = CountingLoader::with(session.clone());
    let gateway = TtsGateway::builder(options()).build(&loader);

    assert!(gateway.is_neural());
    assert_eq!(gateway.name(), "neural");
    assert_eq!(gateway.model_info().unwrap().name, "mock-tts");

    let header = assert_valid_wav(&gateway.convert_to_speech("Hi", "female_1"));
    assert_eq!(header.format, Format::mono(MODEL_RATE, SampleEncoding::Pcm16));
    // "Hi" + BOS/EOS = 4 tokens
    assert_eq!(header.sample_count(), 4 * SAMPLES_PER_TOKEN);
    assert_eq!(session.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_neural_float_output() {
    let session = Arc::new(MockSession::default());
    let options = options().with_encoding(SampleEncoding::Float32);
    let gateway = TtsGateway::builder(options).build(&CountingLoader::with(session));
    let seg = wav::decode(&gateway.convert_to_speech("abc", "male_1")).unwrap();
    assert_eq!(seg.format(), Format::mono(MODEL_RATE, SampleEncoding::Float32));
    assert_eq!(seg.samples().len(), 5 * SAMPLES_PER_TOKEN);
}

#[test]
fn test_per_call_failure_does_not_flip_state() {
    let session = Arc::new(MockSession::default());
    let gateway = TtsGateway::builder(options()).build(&CountingLoader::with(session.clone()));

    // inference error → procedural clip for this call
    let header = assert_valid_wav(&gateway.convert_to_speech("FAIL", "female_1"));
    assert_eq!(header.format.sample_rate, 16000);
    assert_eq!(header.sample_count(), 32000);

    // still neural afterwards
    assert!(gateway.is_neural());
    let header = assert_valid_wav(&gateway.convert_to_speech("ok", "female_1"));
    assert_eq!(header.format.sample_rate, MODEL_RATE);
    assert_eq!(session.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_empty_and_non_finite_output_fall_back() {
    let session = Arc::new(MockSession::default());
    let gateway = TtsGateway::builder(options()).build(&CountingLoader::with(session));

    let empty = assert_valid_wav(&gateway.convert_to_speech("", "male_1"));
    assert_eq!(empty.format.sample_rate, 16000);

    let nan = assert_valid_wav(&gateway.convert_to_speech("~~", "male_1"));
    assert_eq!(nan.format.sample_rate, 16000);
    assert!(gateway.is_neural());
}

#[test]
fn test_session_panic_falls_back() {
    let session = Arc::new(MockSession::default());
    let gateway = TtsGateway::builder(options()).build(&CountingLoader::with(session));
    let header = assert_valid_wav(&gateway.convert_to_speech("Wow!", "female_2"));
    assert_eq!(header.format.sample_rate, 16000);
    assert!(gateway.is_neural());
}

#[test]
fn test_embeddings_are_forwarded() {
    let session = Arc::new(MockSession::default());
    let mut table = EmbeddingTable::new();
    table.insert("female_1", vec![0.5, 0.25]);

    let gateway = TtsGateway::builder(options())
        .embeddings(Arc::new(table))
        .build(&CountingLoader::with(session.clone()));

    gateway.convert_to_speech("a", "FEMALE_1");
    gateway.convert_to_speech("b", "unknown");

    let seen = session.embeddings_seen.lock().unwrap();
    assert_eq!(*seen, vec![Some(vec![0.5, 0.25]), None]);
}

#[test]
fn test_custom_tokenizer() {
    struct FailingTokenizer;
    impl Tokenizer for FailingTokenizer {
        fn tokenize(&self, _text: &str) -> Result<Vec<i64>, NeuralError> {
            Err(NeuralError::Tokenize("no vocab".to_string()))
        }
    }

    let session = Arc::new(MockSession::default());
    let gateway = TtsGateway::builder(options())
        .tokenizer(Arc::new(FailingTokenizer))
        .build(&CountingLoader::with(session.clone()));

    let header = assert_valid_wav(&gateway.convert_to_speech("text", "male_1"));
    assert_eq!(header.format.sample_rate, 16000);
    // session never reached
    assert_eq!(session.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_zero_rate_model_is_unavailable() {
    struct ZeroRateSession;
    impl NeuralSession for ZeroRateSession {
        fn model_info(&self) -> ModelInfo {
            ModelInfo {
                name: "broken".to_string(),
                version: "0".to_string(),
                sample_rate: 0,
            }
        }

        fn run(&self, _tokens: &[i64], _speaker_embedding: Option<&[f32]>) -> Result<Vec<f32>, NeuralError> {
            Ok(vec![0.1; 100])
        }
    }

    let loader = || -> Result<Arc<dyn NeuralSession>, NeuralError> { Ok(Arc::new(ZeroRateSession)) };
    let gateway = TtsGateway::builder(options()).build(&loader);
    assert!(!gateway.is_neural());

    let clip = gateway.convert_to_speech("Hello.", "male_1");
    let seg = wav::decode(&clip).unwrap();
    assert_eq!(seg.format().sample_rate, 16000);

    let (_, report) = Assembler::default().combine_with_report(&[clip.clone(), clip]);
    assert_eq!(report.retained, 2);
    assert!(!report.fallback);
}

#[test]
fn test_zero_procedural_rate_still_decodes() {
    let options = SynthesisOptions {
        sample_rate: 0,
        ..options()
    };
    let gateway = TtsGateway::builder(options).build(&CountingLoader::failing());
    let seg = wav::decode(&gateway.convert_to_speech("Hello.", "male_1")).unwrap();
    assert_eq!(seg.format().sample_rate, 24000);
    assert_eq!(seg.frames(), 48000);
}

// ============================================================================
// Never-Fail Contract
// ============================================================================

#[test]
fn test_every_backend_always_returns_wav() {
    let session = Arc::new(MockSession::default());
    let backends = vec![
        Backend::from_kind(BackendKind::Neural, options(), &CountingLoader::with(session)),
        Backend::from_kind(BackendKind::Neural, options(), &CountingLoader::failing()),
        Backend::from_kind(BackendKind::Procedural, options(), &CountingLoader::failing()),
        Backend::from_kind(BackendKind::Silent, options(), &CountingLoader::failing()),
    ];
    let long = "long ".repeat(500);
    let texts = ["", " ", "\n\t", "FAIL", "~", "Boom!", "Ünïcødé, text.", long.as_str()];
    let voices = ["female_1", "MALE_2", "", "unregistered voice", "🎙"];

    for backend in &backends {
        for text in texts {
            for voice in voices {
                assert_valid_wav(&backend.convert_to_speech(text, voice));
            }
        }
    }
}

#[test]
fn test_backend_kinds() {
    let loader = CountingLoader::failing();
    assert_eq!(Backend::from_kind(BackendKind::Neural, options(), &loader).kind(), BackendKind::Neural);
    assert_eq!(Backend::from_kind(BackendKind::Silent, options(), &loader).name(), "silent");
    assert_eq!(Backend::from_kind(BackendKind::Procedural, options(), &loader).name(), "procedural");
    // procedural and silent never touch the loader
    assert_eq!(loader.loads(), 1);
}

#[test]
fn test_gateway_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TtsGateway>();
    assert_send_sync::<Backend>();

    let session = Arc::new(MockSession::default());
    let gateway = TtsGateway::builder(options()).build(&CountingLoader::with(session.clone()));

    thread::scope(|s| {
        for i in 0..4 {
            let gateway = &gateway;
            s.spawn(move || {
                let text = format!("line {}", i);
                assert_valid_wav(&gateway.convert_to_speech(&text, "male_1"));
            });
        }
    });
    assert_eq!(session.calls.load(Ordering::SeqCst), 4);
}

// ============================================================================
// Dialogue Rendering
// ============================================================================

fn sample_script() -> Script {
    Script::from_turns(vec![
        Turn::new("female_1", "Welcome to the show."),
        Turn::new("male_1", "Thanks, glad to be here."),
        Turn::new("female_1", "Let's get started!"),
        Turn::new("male_2", "Sure."),
        Turn::new("nobody", "   "),
    ])
}

#[test]
fn test_parallel_matches_sequential() {
    let synth = ProceduralSynthesizer::new(options());
    let script = sample_script();
    let lines = script.lines();
    let sequential = synthesize_lines(&synth, &lines, 1);
    let parallel = synthesize_lines(&synth, &lines, 3);
    assert_eq!(sequential.len(), 5);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_render_dialogue_duration() {
    let synth = SilentSynthesizer::new(options());
    let script = sample_script();
    let assembler = Assembler::new(AssemblerOptions::default().with_silence_pad_secs(0.25));

    let podcast = render_dialogue(&synth, &script, &assembler, 2);
    let header = assert_valid_wav(&podcast);
    assert_eq!(header.format, Format::STEREO_44K_F32);

    let speech: f64 = script.turns.iter().map(|t| estimate_duration(&t.text)).sum();
    let expected = speech + 0.25 * (script.turns.len() - 1) as f64;
    let diff = (header.duration().as_secs_f64() - expected).abs();
    // per clip: rounding at 16 kHz plus rounding at 44.1 kHz
    assert!(diff <= script.turns.len() as f64 * 2.0 / 16000.0, "diff {}", diff);
}

#[test]
fn test_render_single_turn_is_raw_clip() {
    let synth = ProceduralSynthesizer::new(options());
    let script = Script::from_turns(vec![Turn::new("male_1", "Solo.")]);
    let podcast = render_dialogue(&synth, &script, &Assembler::default(), 4);
    assert_eq!(podcast, synth.convert_to_speech("Solo.", "male_1"));
}

#[test]
fn test_render_empty_script() {
    let synth = ProceduralSynthesizer::new(options());
    let podcast = render_dialogue(&synth, &Script::default(), &Assembler::default(), 4);
    assert!(podcast.is_empty());
}
