use thiserror::Error;
use voxauth_voiceprint::VoiceprintError;

/// Errors raised during registration or verification.
///
/// The HTTP layer converts these into structured failure payloads with
/// `verified: false`; none of them crash a request.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No decode strategy accepted the upload. Retryable by re-recording.
    #[error("could not read audio file: {0}")]
    UnsupportedAudio(#[from] voxauth_audio::AudioError),

    /// The embedding or transcription capability failed. May be transient.
    #[error("inference error: {0}")]
    Inference(String),

    /// Stored and fresh embeddings are incomparable. Indicates corrupted
    /// or incompatible enrollment data, not a transient fault.
    #[error("error processing embeddings: {0}")]
    EmbeddingShape(String),

    /// Lookup miss. Expected, not a fault; short-circuits before any
    /// inference cost is spent.
    #[error("User not found.")]
    UserNotFound,

    /// The enrollment record bytes did not parse.
    #[error("corrupt enrollment record: {0}")]
    Record(String),

    #[error(transparent)]
    Store(#[from] voxauth_kv::StoreError),
}

impl From<VoiceprintError> for EngineError {
    fn from(e: VoiceprintError) -> Self {
        match e {
            VoiceprintError::Inference(msg) => EngineError::Inference(msg),
            // Mismatched, truncated, or degenerate vectors all mean the
            // acoustic comparison is undefined.
            other => EngineError::EmbeddingShape(other.to_string()),
        }
    }
}
