//! The normalization fallback chain.

use tracing::{debug, warn};

use crate::canonical::{CanonicalAudio, Decoded, SAMPLE_RATE};
use crate::{AudioError, Transcoder, decode, resample::resample, wav};

/// Turns raw upload bytes into [`CanonicalAudio`].
///
/// Tiers are tried in order, first success wins:
/// direct WAV decode, external transcode, permissive symphonia decode.
/// Whatever tier succeeds, the signal is then conditioned: averaged to
/// mono, resampled to 16 kHz, and peak-rescaled when it exceeds [-1, 1].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    transcoder: Transcoder,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a non-default transcoder command (tests, containers where
    /// ffmpeg lives off PATH).
    pub fn with_transcoder(transcoder: Transcoder) -> Self {
        Self { transcoder }
    }

    /// Normalizes raw audio bytes, or fails with
    /// [`AudioError::Unsupported`] when every tier is exhausted.
    pub fn normalize(&self, raw: &[u8]) -> Result<CanonicalAudio, AudioError> {
        let direct_err = match wav::decode(raw) {
            Ok(decoded) => {
                debug!(
                    rate = decoded.sample_rate,
                    channels = decoded.channels,
                    "direct decode"
                );
                return condition(decoded);
            }
            Err(e) => e.to_string(),
        };

        match self.transcoder.transcode(raw) {
            Ok(decoded) => {
                debug!(rate = decoded.sample_rate, "transcoded");
                return condition(decoded);
            }
            Err(e) => warn!(error = %e, "transcode tier failed"),
        }

        match decode::decode_any(raw) {
            Ok(decoded) => {
                debug!(rate = decoded.sample_rate, "permissive decode");
                condition(decoded)
            }
            Err(fallback) => Err(AudioError::Unsupported {
                direct: direct_err,
                fallback: fallback.to_string(),
            }),
        }
    }
}

/// Post-decode conditioning, applied regardless of which tier produced
/// the signal: mono downmix, 16 kHz resample, peak rescale.
pub(crate) fn condition(decoded: Decoded) -> Result<CanonicalAudio, AudioError> {
    let Decoded {
        samples,
        sample_rate,
        channels,
    } = decoded;

    let mut samples = if channels > 1 {
        samples
            .chunks_exact(channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    if sample_rate != SAMPLE_RATE {
        samples = resample(&samples, sample_rate, SAMPLE_RATE)?;
    }

    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    if peak > 1.0 {
        let scale = 1.0 / peak;
        for s in &mut samples {
            *s *= scale;
        }
    }

    CanonicalAudio::new(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::{encode_mono16, i16_to_f32};

    fn sine_mono(n: usize) -> Vec<f32> {
        // Quantized to i16 grid so WAV roundtrips are exact.
        (0..n)
            .map(|i| i16_to_f32(((i as f32 * 0.05).sin() * 20_000.0) as i16))
            .collect()
    }

    fn chain_without_ffmpeg() -> Normalizer {
        Normalizer::with_transcoder(Transcoder::new("no-such-transcoder"))
    }

    #[test]
    fn direct_wav_passes_through() {
        let samples = sine_mono(16_000);
        let bytes = encode_mono16(&samples, 16_000).unwrap();

        let audio = chain_without_ffmpeg().normalize(&bytes).unwrap();
        assert_eq!(audio.samples(), samples.as_slice());
    }

    #[test]
    fn normalize_is_idempotent_on_canonical_audio() {
        let samples = sine_mono(8_000);
        let n = chain_without_ffmpeg();

        let once = n
            .normalize(&encode_mono16(&samples, 16_000).unwrap())
            .unwrap();
        let twice = n
            .normalize(&encode_mono16(once.samples(), 16_000).unwrap())
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn stereo_collapses_to_channel_average() {
        let decoded = Decoded {
            samples: vec![0.2, 0.4, -0.2, -0.4, 1.0, 0.0],
            sample_rate: 16_000,
            channels: 2,
        };
        let audio = condition(decoded).unwrap();
        let expected = [0.3f32, -0.3, 0.5];
        for (got, want) in audio.samples().iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[test]
    fn resamples_non_canonical_rate() {
        let samples = sine_mono(44_100);
        let bytes = encode_mono16(&samples, 44_100).unwrap();

        let audio = chain_without_ffmpeg().normalize(&bytes).unwrap();
        // One second of 44.1kHz input becomes ~one second at 16kHz.
        let ratio = audio.samples().len() as f64 / 16_000.0;
        assert!((ratio - 1.0).abs() < 0.1, "ratio: {ratio}");
    }

    #[test]
    fn peak_above_one_is_rescaled() {
        let decoded = Decoded {
            samples: vec![0.5, -2.0, 1.0],
            sample_rate: 16_000,
            channels: 1,
        };
        let audio = condition(decoded).unwrap();
        let peak = audio.samples().iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        assert!((peak - 1.0).abs() < 1e-6);
        assert!((audio.samples()[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn peak_within_range_untouched() {
        let decoded = Decoded {
            samples: vec![0.5, -0.25],
            sample_rate: 16_000,
            channels: 1,
        };
        let audio = condition(decoded).unwrap();
        assert_eq!(audio.samples(), &[0.5, -0.25]);
    }

    #[test]
    fn unsupported_carries_both_failure_messages() {
        let err = chain_without_ffmpeg()
            .normalize(b"corrupt upload bytes")
            .unwrap_err();
        match err {
            AudioError::Unsupported { direct, fallback } => {
                assert!(!direct.is_empty());
                assert!(!fallback.is_empty());
            }
            other => panic!("expected Unsupported, got {other}"),
        }
    }

    #[test]
    fn empty_upload_is_unsupported() {
        assert!(matches!(
            chain_without_ffmpeg().normalize(b""),
            Err(AudioError::Unsupported { .. })
        ));
    }
}
