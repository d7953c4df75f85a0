use voxauth_audio::CanonicalAudio;

/// Error type for transcription operations.
#[derive(Debug, thiserror::Error)]
pub enum AsrError {
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Interface for complete-utterance speech recognition.
///
/// Implementations wrap an external capability (cloud STT API or a
/// local model sidecar) and must be safe for concurrent use.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribes mono 16 kHz audio into plain text.
    async fn transcribe(&self, audio: &CanonicalAudio) -> Result<String, AsrError>;

    /// Short provider label for health reporting and logs.
    fn name(&self) -> &str;
}
