use crate::AudioError;

/// Sample rate every downstream stage assumes.
pub const SAMPLE_RATE: u32 = 16_000;

/// Single-channel, 16 kHz, amplitude-bounded waveform.
///
/// Invariant: at least one sample, peak amplitude within [-1, 1].
/// Construction goes through the normalizer, which enforces both.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalAudio {
    samples: Vec<f32>,
}

impl CanonicalAudio {
    /// Wraps conditioned samples. Fails on an empty signal; the
    /// normalizer owns amplitude conditioning before this point.
    pub(crate) fn new(samples: Vec<f32>) -> Result<Self, AudioError> {
        if samples.is_empty() {
            return Err(AudioError::Empty);
        }
        Ok(Self { samples })
    }

    /// Builds canonical audio from samples already known to be mono,
    /// 16 kHz and peak-bounded. Used by callers that synthesize audio
    /// directly (tests, local capture).
    pub fn from_samples(samples: Vec<f32>) -> Result<Self, AudioError> {
        crate::normalize::condition(Decoded {
            samples,
            sample_rate: SAMPLE_RATE,
            channels: 1,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / SAMPLE_RATE as f32
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

/// Raw decoder output before conditioning: interleaved samples at the
/// container's native rate and channel count.
#[derive(Debug, Clone)]
pub(crate) struct Decoded {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}
