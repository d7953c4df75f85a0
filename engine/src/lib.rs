//! Verification decision engine.
//!
//! Given raw upload bytes and a claimed identity, the [`Engine`] runs
//! one verification attempt end to end: look up the enrollment record,
//! normalize the audio, extract a fresh voice print and transcript,
//! compare both signals against the stored reference, and render a
//! [`VerificationResult`]. Failures surface as structured results,
//! never as propagated faults; the default posture on any ambiguity is
//! "not verified".
//!
//! Capabilities (speaker encoder, transcription providers, enrollment
//! store) are constructed once at process start and injected, which
//! keeps the engine substitutable with fakes in tests.

mod engine;
mod error;
mod phrase;
mod record;
mod result;

pub use engine::{Engine, SPEAKER_THRESHOLD};
pub use error::EngineError;
pub use phrase::{PHRASE_OVERLAP_THRESHOLD, overlap_ratio, phrase_match};
pub use record::EnrollmentRecord;
pub use result::{Dependencies, HealthReport, RegistrationResult, VerificationResult};
