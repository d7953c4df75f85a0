//! Automatic speech recognition for voice verification.
//!
//! Transcription is advisory: the phrase comparison tolerates ASR
//! noise, and a failed transcription must never fail the enclosing
//! register or verify operation. [`TranscriptPolicy`] encodes that
//! posture: try the cloud provider, fall back to the local one, and
//! yield an empty transcript when both are out.

mod cloud;
mod local;
mod policy;
mod transcriber;

pub use cloud::CloudTranscriber;
pub use local::LocalTranscriber;
pub use policy::TranscriptPolicy;
pub use transcriber::{AsrError, Transcriber};
