//! Audio normalization for voice verification.
//!
//! Uploaded audio arrives in whatever container the client recorder
//! produced, sometimes truncated or mislabeled. This crate turns raw
//! bytes into [`CanonicalAudio`] (mono, 16 kHz, peak within [-1, 1])
//! through an ordered fallback chain:
//!
//! 1. Direct WAV decode ([`wav`])
//! 2. External transcode via ffmpeg ([`Transcoder`])
//! 3. Permissive multi-format decode via symphonia ([`decode`])
//!
//! Well-formed uploads pay only the cost of step 1. The chain is
//! exposed through [`Normalizer::normalize`], which either yields
//! canonical audio or fails with [`AudioError::Unsupported`] carrying
//! the per-tier failure messages.

mod canonical;
mod decode;
mod error;
mod normalize;
mod resample;
mod transcode;
pub mod wav;

pub use canonical::{CanonicalAudio, SAMPLE_RATE};
pub use error::AudioError;
pub use normalize::Normalizer;
pub use resample::resample;
pub use transcode::{TranscodeError, Transcoder};
