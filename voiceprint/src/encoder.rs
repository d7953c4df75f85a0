use voxauth_audio::CanonicalAudio;

use crate::{VoicePrint, VoiceprintError};

/// Extracts speaker embeddings from canonical audio.
///
/// The inference capability itself (the speaker-recognition model) is a
/// process-wide, expensive-to-initialize resource living outside this
/// crate; implementations wrap it and must be safe for concurrent use.
/// Returned prints must be length-consistent across calls, otherwise
/// comparisons against stored enrollments become meaningless.
#[async_trait::async_trait]
pub trait SpeakerEncoder: Send + Sync {
    /// Computes a voice print from mono 16 kHz audio.
    async fn encode(&self, audio: &CanonicalAudio) -> Result<VoicePrint, VoiceprintError>;

    /// Returns the dimensionality of produced prints (e.g. 192).
    fn dimension(&self) -> usize;
}
