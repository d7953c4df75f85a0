//! HTTP client for a speaker-embedding inference sidecar.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use voxauth_audio::CanonicalAudio;

use crate::{SpeakerEncoder, VoicePrint, VoiceprintError};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Speaker encoder backed by a remote inference service.
///
/// Posts canonical samples as JSON and expects `{"embedding": [f32]}`
/// back. The response shape is validated against the configured
/// dimension; a wrong-length vector is an inference error, never a
/// silent pass-through.
pub struct RemoteEncoder {
    client: Client,
    endpoint: String,
    dim: usize,
}

#[derive(Serialize)]
struct EncodeRequest<'a> {
    samples: &'a [f32],
    sample_rate: u32,
}

#[derive(Deserialize)]
struct EncodeResponse {
    embedding: Vec<f32>,
}

impl RemoteEncoder {
    /// Creates an encoder client for the given endpoint URL, expecting
    /// `dim`-length embeddings.
    pub fn new(endpoint: &str, dim: usize) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.to_string(),
            dim,
        }
    }
}

#[async_trait::async_trait]
impl SpeakerEncoder for RemoteEncoder {
    async fn encode(&self, audio: &CanonicalAudio) -> Result<VoicePrint, VoiceprintError> {
        let req = EncodeRequest {
            samples: audio.samples(),
            sample_rate: audio.sample_rate(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&req)
            .send()
            .await
            .map_err(|e| VoiceprintError::Inference(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VoiceprintError::Inference(format!(
                "encoder returned {status}: {body}"
            )));
        }

        let body: EncodeResponse = resp
            .json()
            .await
            .map_err(|e| VoiceprintError::Inference(format!("malformed response: {e}")))?;

        if body.embedding.len() != self.dim {
            return Err(VoiceprintError::Inference(format!(
                "encoder returned {} values, expected {}",
                body.embedding.len(),
                self.dim
            )));
        }

        Ok(VoicePrint::from_vec(body.embedding))
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}
