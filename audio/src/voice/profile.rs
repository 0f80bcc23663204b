//! Built-in voice table.

/// Acoustic parameters driving the formant generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceCharacteristics {
    /// Fundamental frequency in Hz
    pub base_frequency: f64,
    /// Weight of the low formant partial
    pub resonance: f64,
    /// Weight of the high formant partial
    pub brightness: f64,
}

impl VoiceCharacteristics {
    /// Creates voice characteristics.
    pub const fn new(base_frequency: f64, resonance: f64, brightness: f64) -> Self {
        Self {
            base_frequency,
            resonance,
            brightness,
        }
    }
}

impl Default for VoiceCharacteristics {
    fn default() -> Self {
        NEUTRAL_VOICE
    }
}

/// Characteristics used for any identifier missing from [`ALL_VOICES`].
pub const NEUTRAL_VOICE: VoiceCharacteristics = VoiceCharacteristics::new(165.0, 1.0, 1.0);

/// A named entry of the voice table.
#[derive(Debug, Clone, Copy)]
pub struct VoiceProfile {
    pub id: &'static str,
    pub characteristics: VoiceCharacteristics,
}

impl VoiceProfile {
    pub const fn new(id: &'static str, characteristics: VoiceCharacteristics) -> Self {
        Self { id, characteristics }
    }

    /// Looks up a profile by identifier, ignoring case and surrounding whitespace.
    pub fn by_id(id: &str) -> Option<&'static VoiceProfile> {
        let id = id.trim();
        ALL_VOICES.iter().find(|v| v.id.eq_ignore_ascii_case(id))
    }
}

/// Every built-in voice.
pub static ALL_VOICES: &[VoiceProfile] = &[
    VoiceProfile::new("female_1", VoiceCharacteristics::new(220.0, 0.8, 1.2)),
    VoiceProfile::new("female_2", VoiceCharacteristics::new(200.0, 0.9, 1.1)),
    VoiceProfile::new("male_1", VoiceCharacteristics::new(130.0, 1.0, 0.9)),
    VoiceProfile::new("male_2", VoiceCharacteristics::new(110.0, 1.1, 0.8)),
];

/// Resolves a voice identifier to its characteristics.
///
/// Total: unknown identifiers resolve to [`NEUTRAL_VOICE`].
pub fn resolve_voice(voice_id: &str) -> VoiceCharacteristics {
    VoiceProfile::by_id(voice_id)
        .map(|v| v.characteristics)
        .unwrap_or(NEUTRAL_VOICE)
}

/// Returns the identifiers of all built-in voices.
pub fn known_voices() -> impl Iterator<Item = &'static str> {
    ALL_VOICES.iter().map(|v| v.id)
}
