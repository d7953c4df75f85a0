//! Local transcription provider.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use voxauth_audio::CanonicalAudio;

use crate::{AsrError, Transcriber};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Transcriber backed by a local ASR model sidecar.
///
/// Unlike the cloud provider, the sidecar takes the raw sample tensor
/// and sample rate directly as JSON; no container framing is involved.
pub struct LocalTranscriber {
    client: Client,
    endpoint: String,
}

#[derive(Serialize)]
struct LocalRequest<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

#[derive(Deserialize)]
struct LocalResponse {
    transcript: String,
}

impl LocalTranscriber {
    pub fn new(endpoint: &str) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for LocalTranscriber {
    async fn transcribe(&self, audio: &CanonicalAudio) -> Result<String, AsrError> {
        let req = LocalRequest {
            samples: audio.samples(),
            sample_rate: audio.sample_rate(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&req)
            .send()
            .await
            .map_err(|e| AsrError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AsrError::TranscriptionFailed(format!(
                "local provider returned {status}"
            )));
        }

        let body: LocalResponse = resp
            .json()
            .await
            .map_err(|e| AsrError::TranscriptionFailed(format!("malformed response: {e}")))?;
        Ok(body.transcript)
    }

    fn name(&self) -> &str {
        "local"
    }
}
