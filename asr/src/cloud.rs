//! Cloud transcription provider.

use std::time::Duration;

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use voxauth_audio::CanonicalAudio;

use crate::{AsrError, Transcriber};

/// Language hint sent with every request.
const LANGUAGE: &str = "en-US";

/// Upper bound on a single cloud request. The policy falls back to the
/// local provider rather than blocking a verification on a slow API.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transcriber backed by a cloud speech-to-text API.
///
/// The audio is rendered as a 16-bit mono WAV attachment, the form the
/// provider ingests as a file-like resource, with an `en-US` language
/// hint. Expects `{"transcript": "..."}` back.
pub struct CloudTranscriber {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Deserialize)]
struct CloudResponse {
    transcript: String,
}

impl CloudTranscriber {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl Transcriber for CloudTranscriber {
    async fn transcribe(&self, audio: &CanonicalAudio) -> Result<String, AsrError> {
        let wav = voxauth_audio::wav::encode_mono16(audio.samples(), audio.sample_rate())
            .map_err(|e| AsrError::TranscriptionFailed(format!("wav encode: {e}")))?;
        let form = Form::new()
            .part(
                "file",
                Part::bytes(wav)
                    .file_name("utterance.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| AsrError::TranscriptionFailed(e.to_string()))?,
            )
            .text("language", LANGUAGE);

        let mut req = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = tokio::time::timeout(self.timeout, req.send())
            .await
            .map_err(|_| AsrError::Timeout(self.timeout))?
            .map_err(|e| AsrError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AsrError::TranscriptionFailed(format!(
                "cloud provider returned {status}"
            )));
        }

        let body: CloudResponse = resp
            .json()
            .await
            .map_err(|e| AsrError::TranscriptionFailed(format!("malformed response: {e}")))?;
        Ok(body.transcript)
    }

    fn name(&self) -> &str {
        "cloud"
    }
}
