//! Speaker embeddings for voice verification.
//!
//! A [`VoicePrint`] is a fixed-length f32 vector summarizing a
//! speaker's vocal characteristics. It is opaque except for its
//! dimensionality, which must agree between any two prints being
//! compared. Prints persist as raw little-endian f32 bytes
//! ([`VoicePrint::to_bytes`], dimension x 4).
//!
//! Extraction is a black-box capability behind [`SpeakerEncoder`];
//! [`RemoteEncoder`] talks to an inference sidecar over HTTP.

mod cosine;
mod encoder;
mod error;
mod print;
mod remote;

pub use cosine::cosine_similarity;
pub use encoder::SpeakerEncoder;
pub use error::VoiceprintError;
pub use print::VoicePrint;
pub use remote::RemoteEncoder;
