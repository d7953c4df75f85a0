//! Two-tier provider policy.

use std::sync::Arc;

use tracing::warn;
use voxauth_audio::CanonicalAudio;

use crate::Transcriber;

/// Cloud-first transcription with local fallback.
///
/// Providers are optional; an unconfigured tier is simply skipped.
/// When every configured provider fails, the policy yields an empty
/// transcript instead of an error: the phrase signal is advisory and
/// must not sink the enclosing operation. All transcripts come back
/// lowercased and trimmed.
#[derive(Clone, Default)]
pub struct TranscriptPolicy {
    cloud: Option<Arc<dyn Transcriber>>,
    local: Option<Arc<dyn Transcriber>>,
}

impl TranscriptPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cloud(mut self, cloud: Arc<dyn Transcriber>) -> Self {
        self.cloud = Some(cloud);
        self
    }

    pub fn with_local(mut self, local: Arc<dyn Transcriber>) -> Self {
        self.local = Some(local);
        self
    }

    /// Provider labels, in try order. Used for health reporting.
    pub fn providers(&self) -> Vec<&str> {
        self.cloud
            .iter()
            .chain(self.local.iter())
            .map(|t| t.name())
            .collect()
    }

    /// Transcribes with fallback. Never fails; worst case is "".
    pub async fn transcript(&self, audio: &CanonicalAudio) -> String {
        for tier in self.cloud.iter().chain(self.local.iter()) {
            match tier.transcribe(audio).await {
                Ok(text) => {
                    let text = normalize_transcript(&text);
                    if !text.is_empty() {
                        return text;
                    }
                }
                Err(e) => warn!(provider = tier.name(), error = %e, "transcription tier failed"),
            }
        }
        String::new()
    }
}

/// Lowercases and trims a raw provider transcript.
fn normalize_transcript(text: &str) -> String {
    text.trim().to_lowercase()
}
