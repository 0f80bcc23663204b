//! Amplitude envelope approximating speech rhythm.

use std::f64::consts::PI;

/// Fraction of each word period that is voiced; the rest is a micro-pause.
pub const WORD_DUTY_CYCLE: f64 = 0.7;

/// Length of the linear fade at each end of a clip, in seconds.
pub const FADE_SECONDS: f64 = 0.05;

/// Frequency of the slow loudness drift, in Hz.
const DRIFT_HZ: f64 = 0.5;

/// Computes the envelope at time `t` of a clip lasting `duration` seconds
/// spoken at `words_per_second`.
///
/// The result is in `[0, 1]`. Pure: identical inputs give identical output.
pub fn speech_envelope(t: f64, duration: f64, words_per_second: f64) -> f64 {
    let word_phase = (t * words_per_second).rem_euclid(1.0);
    if word_phase >= WORD_DUTY_CYCLE {
        return 0.0;
    }

    let mut amplitude = 1.0;
    if t < FADE_SECONDS {
        amplitude *= t / FADE_SECONDS;
    }
    let remaining = duration - t;
    if remaining < FADE_SECONDS {
        amplitude *= remaining / FADE_SECONDS;
    }

    amplitude *= 0.7 + 0.3 * (2.0 * PI * DRIFT_HZ * t).sin();
    amplitude.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_silent() {
        assert_eq!(speech_envelope(0.0, 2.0, 2.0), 0.0);
    }

    #[test]
    fn test_fade_in_is_linear() {
        // drift term at t is 0.7 + 0.3 sin(pi t)
        let t = 0.025;
        let expected = 0.5 * (0.7 + 0.3 * (PI * t).sin());
        assert!((speech_envelope(t, 2.0, 1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_fade_out_reaches_zero() {
        assert_eq!(speech_envelope(2.0, 2.0, 1.0), 0.0);
        let near_end = speech_envelope(1.99, 2.0, 1.0);
        // inside a pause at 1.99 with 1 word/s (phase 0.99 > 0.7)
        assert_eq!(near_end, 0.0);
        let t = 1.96;
        let v = speech_envelope(t, 2.0, 0.25);
        let expected = (0.04 / FADE_SECONDS) * (0.7 + 0.3 * (PI * t).sin());
        assert!((v - expected).abs() < 1e-9);
    }

    #[test]
    fn test_pause_phase_is_silent() {
        // 2 words/s: phase at t=0.4 is 0.8
        assert_eq!(speech_envelope(0.4, 5.0, 2.0), 0.0);
        // phase at t=0.25 is 0.5, voiced
        assert!(speech_envelope(0.25, 5.0, 2.0) > 0.0);
    }

    #[test]
    fn test_bounded() {
        for i in 0..10_000 {
            let t = i as f64 * 0.001;
            let v = speech_envelope(t, 10.0, 3.3);
            assert!((0.0..=1.0).contains(&v), "t={} v={}", t, v);
        }
        assert_eq!(speech_envelope(-0.1, 1.0, 0.5), 0.0);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(speech_envelope(1.2345, 4.0, 2.5), speech_envelope(1.2345, 4.0, 2.5));
    }
}
