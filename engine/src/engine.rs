use std::sync::Arc;

use tracing::{info, warn};
use voxauth_asr::TranscriptPolicy;
use voxauth_audio::Normalizer;
use voxauth_kv::KVStore;
use voxauth_voiceprint::{SpeakerEncoder, VoicePrint};

use crate::{
    EngineError, EnrollmentRecord, RegistrationResult, VerificationResult, phrase,
    result::{Dependencies, HealthReport},
};

/// Cosine similarity above which two prints count as the same speaker.
/// Strictly greater-than; a score of exactly 0.75 does not match.
pub const SPEAKER_THRESHOLD: f64 = 0.75;

/// Key probed by [`Engine::health`] to confirm the store answers reads.
const HEALTH_PROBE_KEY: &str = "__health__";

/// Runs registration and verification attempts.
///
/// Holds no per-request state: each call is an independent unit of
/// work, and the only shared mutable state is the enrollment store,
/// whose per-key operations are atomic.
pub struct Engine {
    store: Arc<dyn KVStore>,
    encoder: Arc<dyn SpeakerEncoder>,
    transcripts: TranscriptPolicy,
    normalizer: Normalizer,
}

impl Engine {
    pub fn new(
        store: Arc<dyn KVStore>,
        encoder: Arc<dyn SpeakerEncoder>,
        transcripts: TranscriptPolicy,
    ) -> Self {
        Self {
            store,
            encoder,
            transcripts,
            normalizer: Normalizer::new(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Enrolls (or re-enrolls) a user from an audio sample.
    ///
    /// The store write is the last step: any failure in normalization
    /// or extraction aborts the operation with no partial record, and
    /// re-registration silently replaces the prior reference.
    pub async fn register(
        &self,
        user_id: &str,
        raw: &[u8],
    ) -> Result<RegistrationResult, EngineError> {
        let (print, phrase) = self.extract(raw).await?;

        let record = EnrollmentRecord::new(user_id, &print, &phrase);
        self.store.set(user_id, &record.to_store_bytes()?)?;
        info!(user_id, dim = print.dimension(), "user registered");

        Ok(RegistrationResult {
            message: format!("User {user_id} registered successfully."),
            stored_phrase: phrase,
            verified: true,
        })
    }

    /// Runs one verification attempt against the stored enrollment.
    ///
    /// Never returns an error: every failure folds into a structured
    /// result with `verified: false`. An unknown user short-circuits
    /// before any audio processing or inference is attempted.
    pub async fn verify(&self, user_id: &str, raw: &[u8]) -> VerificationResult {
        let stored = match self.store.get(user_id) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                warn!(user_id, "verification for unknown user");
                return VerificationResult::rejected(EngineError::UserNotFound.to_string());
            }
            Err(e) => return VerificationResult::rejected(e.to_string()),
        };

        match self.compare(&stored, raw).await {
            Ok(result) => result,
            Err(e) => {
                warn!(user_id, error = %e, "verification failed");
                VerificationResult::rejected(e.to_string())
            }
        }
    }

    async fn compare(&self, stored: &[u8], raw: &[u8]) -> Result<VerificationResult, EngineError> {
        let record = EnrollmentRecord::from_store_bytes(stored)?;
        let (fresh, transcript) = self.extract(raw).await?;

        let reference = record.voice_print()?;
        let similarity = reference.similarity(&fresh)?;
        let speaker_match = similarity > SPEAKER_THRESHOLD;
        let phrase_match = phrase::phrase_match(&record.phrase, &transcript);
        info!(
            similarity = round4(similarity),
            speaker_match, phrase_match, "comparison complete"
        );

        Ok(VerificationResult::decided(
            speaker_match,
            phrase_match,
            round4(similarity),
            transcript,
            record.phrase,
        ))
    }

    /// Normalizes the upload and extracts both signals. Print and
    /// transcript are independent; neither depends on the other's
    /// outcome, only the print extraction can fail the operation.
    async fn extract(&self, raw: &[u8]) -> Result<(VoicePrint, String), EngineError> {
        let audio = self.normalizer.normalize(raw)?;
        let print = self.encoder.encode(&audio).await?;
        let transcript = self.transcripts.transcript(&audio).await;
        Ok((print, transcript))
    }

    /// Reports service status and dependency availability.
    pub fn health(&self) -> HealthReport {
        let store_ok = self.store.get(HEALTH_PROBE_KEY).is_ok();
        HealthReport {
            status: if store_ok { "ok" } else { "degraded" },
            service: "voxauth",
            dependencies: Dependencies {
                store: store_ok,
                encoder_dimension: self.encoder.dimension(),
                transcription_providers: self
                    .transcripts
                    .providers()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            },
        }
    }
}

/// Rounds to 4 decimal places for reporting.
fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use voxauth_asr::{AsrError, Transcriber};
    use voxauth_audio::{CanonicalAudio, Transcoder};
    use voxauth_kv::MemoryStore;
    use voxauth_voiceprint::VoiceprintError;

    use super::*;

    /// Encoder returning scripted prints in call order.
    struct ScriptedEncoder {
        prints: Mutex<VecDeque<Vec<f32>>>,
        calls: AtomicUsize,
        dim: usize,
    }

    impl ScriptedEncoder {
        fn new(prints: Vec<Vec<f32>>) -> Self {
            let dim = prints.first().map_or(0, Vec::len);
            Self {
                prints: Mutex::new(prints.into()),
                calls: AtomicUsize::new(0),
                dim,
            }
        }
    }

    #[async_trait::async_trait]
    impl SpeakerEncoder for ScriptedEncoder {
        async fn encode(&self, _audio: &CanonicalAudio) -> Result<VoicePrint, VoiceprintError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut prints = self.prints.lock().unwrap();
            prints
                .pop_front()
                .map(VoicePrint::from_vec)
                .ok_or_else(|| VoiceprintError::Inference("no scripted print left".into()))
        }

        fn dimension(&self) -> usize {
            self.dim
        }
    }

    struct FixedTranscriber(&'static str);

    #[async_trait::async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, _audio: &CanonicalAudio) -> Result<String, AsrError> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn wav_upload() -> Vec<u8> {
        let samples: Vec<f32> = (0..3200).map(|i| (i as f32 * 0.05).sin() * 0.4).collect();
        voxauth_audio::wav::encode_mono16(&samples, 16_000).unwrap()
    }

    fn engine_with(
        encoder: Arc<ScriptedEncoder>,
        transcript: &'static str,
    ) -> (Engine, Arc<ScriptedEncoder>) {
        let policy =
            TranscriptPolicy::new().with_local(Arc::new(FixedTranscriber(transcript)));
        let engine = Engine::new(Arc::new(MemoryStore::new()), encoder.clone(), policy)
            .with_normalizer(Normalizer::with_transcoder(Transcoder::new(
                "no-such-transcoder",
            )));
        (engine, encoder)
    }

    #[tokio::test]
    async fn register_then_verify_same_voice() {
        let enc = Arc::new(ScriptedEncoder::new(vec![
            vec![0.1, 0.9, -0.3],
            vec![0.1, 0.9, -0.3],
        ]));
        let (engine, _) = engine_with(enc, "open the door");

        let reg = engine.register("alice", &wav_upload()).await.unwrap();
        assert!(reg.verified);
        assert_eq!(reg.stored_phrase, "open the door");

        let result = engine.verify("alice", &wav_upload()).await;
        assert!(result.verified);
        assert_eq!(result.speaker_match, Some(true));
        assert_eq!(result.phrase_match, Some(true));
        assert_eq!(result.similarity_score, Some(1.0));
        assert_eq!(result.expected_phrase.as_deref(), Some("open the door"));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn different_voice_is_rejected() {
        // Orthogonal prints: similarity 0.
        let enc = Arc::new(ScriptedEncoder::new(vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
        ]));
        let (engine, _) = engine_with(enc, "open the door");

        engine.register("alice", &wav_upload()).await.unwrap();
        let result = engine.verify("alice", &wav_upload()).await;
        assert!(!result.verified);
        assert_eq!(result.speaker_match, Some(false));
        assert_eq!(result.similarity_score, Some(0.0));
        // Phrase still matched; it is reported but does not gate.
        assert_eq!(result.phrase_match, Some(true));
    }

    #[tokio::test]
    async fn unknown_user_short_circuits_before_inference() {
        let enc = Arc::new(ScriptedEncoder::new(vec![vec![1.0, 0.0]]));
        let (engine, enc) = engine_with(enc, "anything");

        let result = engine.verify("nobody", &wav_upload()).await;
        assert!(!result.verified);
        assert_eq!(result.error.as_deref(), Some("User not found."));
        assert_eq!(result.speaker_match, None);
        assert_eq!(enc.calls.load(Ordering::SeqCst), 0, "no inference spent");
    }

    #[tokio::test]
    async fn dimension_mismatch_is_structured_error() {
        let enc = Arc::new(ScriptedEncoder::new(vec![
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0, 0.0],
        ]));
        let (engine, _) = engine_with(enc, "x");

        engine.register("alice", &wav_upload()).await.unwrap();
        let result = engine.verify("alice", &wav_upload()).await;
        assert!(!result.verified);
        let msg = result.error.expect("diagnostic message");
        assert!(msg.contains("dimension mismatch"), "{msg}");
    }

    #[tokio::test]
    async fn unsupported_audio_is_structured_error() {
        let enc = Arc::new(ScriptedEncoder::new(vec![vec![1.0, 0.0], vec![1.0, 0.0]]));
        let (engine, _) = engine_with(enc, "x");

        engine.register("alice", &wav_upload()).await.unwrap();
        let result = engine.verify("alice", b"not audio").await;
        assert!(!result.verified);
        assert!(result.error.unwrap().contains("unsupported audio"));
    }

    #[tokio::test]
    async fn register_failure_writes_no_partial_record() {
        // Encoder fails on the first call.
        let enc = Arc::new(ScriptedEncoder::new(vec![]));
        let (engine, _) = engine_with(enc, "x");

        assert!(engine.register("alice", &wav_upload()).await.is_err());
        assert_eq!(engine.store.get("alice").unwrap(), None);
    }

    #[tokio::test]
    async fn reregistration_replaces_the_record() {
        let enc = Arc::new(ScriptedEncoder::new(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ]));
        let policy = TranscriptPolicy::new().with_local(Arc::new(FixedTranscriber("first")));
        let store = Arc::new(MemoryStore::new());
        let engine = Engine::new(store.clone(), enc, policy).with_normalizer(
            Normalizer::with_transcoder(Transcoder::new("no-such-transcoder")),
        );

        engine.register("alice", &wav_upload()).await.unwrap();
        engine.register("alice", &wav_upload()).await.unwrap();

        let bytes = store.get("alice").unwrap().expect("one record");
        let record = EnrollmentRecord::from_store_bytes(&bytes).unwrap();
        assert_eq!(record.voice_print().unwrap().values(), &[0.0, 1.0]);
    }

    #[tokio::test]
    async fn empty_enrolled_phrase_matches_vacuously() {
        let enc = Arc::new(ScriptedEncoder::new(vec![
            vec![0.5, 0.5],
            vec![0.5, 0.5],
        ]));
        // Enrollment transcription yields nothing; verification hears words.
        let store = Arc::new(MemoryStore::new());
        let register_engine = Engine::new(
            store.clone(),
            enc.clone(),
            TranscriptPolicy::new(),
        )
        .with_normalizer(Normalizer::with_transcoder(Transcoder::new(
            "no-such-transcoder",
        )));
        register_engine.register("alice", &wav_upload()).await.unwrap();

        let verify_engine = Engine::new(
            store,
            enc,
            TranscriptPolicy::new().with_local(Arc::new(FixedTranscriber("whatever was said"))),
        )
        .with_normalizer(Normalizer::with_transcoder(Transcoder::new(
            "no-such-transcoder",
        )));
        let result = verify_engine.verify("alice", &wav_upload()).await;
        assert_eq!(result.phrase_match, Some(true));
        assert!(result.verified);
    }

    #[tokio::test]
    async fn similarity_rounding_is_four_decimals() {
        // cos between these is 1/sqrt(2) = 0.70710678... -> 0.7071.
        let enc = Arc::new(ScriptedEncoder::new(vec![
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ]));
        let (engine, _) = engine_with(enc, "x");

        engine.register("alice", &wav_upload()).await.unwrap();
        let result = engine.verify("alice", &wav_upload()).await;
        assert_eq!(result.similarity_score, Some(0.7071));
        // 0.7071 < 0.75: close is not enough.
        assert_eq!(result.speaker_match, Some(false));
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        assert!(!(0.75 > SPEAKER_THRESHOLD));
        assert!(0.7501 > SPEAKER_THRESHOLD);
        assert!(0.81 > SPEAKER_THRESHOLD);
    }

    #[tokio::test]
    async fn health_reports_dependencies() {
        let enc = Arc::new(ScriptedEncoder::new(vec![vec![0.0; 192]]));
        let (engine, _) = engine_with(enc, "x");

        let health = engine.health();
        assert_eq!(health.status, "ok");
        assert!(health.dependencies.store);
        assert_eq!(health.dependencies.encoder_dimension, 192);
        assert_eq!(health.dependencies.transcription_providers, vec!["fixed"]);
    }

    #[tokio::test]
    async fn extract_produces_normalized_transcript() {
        let enc = Arc::new(ScriptedEncoder::new(vec![vec![1.0, 0.0]]));
        let policy =
            TranscriptPolicy::new().with_local(Arc::new(FixedTranscriber("  Mixed CASE  ")));
        let engine = Engine::new(Arc::new(MemoryStore::new()), enc, policy).with_normalizer(
            Normalizer::with_transcoder(Transcoder::new("no-such-transcoder")),
        );

        let (_, transcript) = engine.extract(&wav_upload()).await.unwrap();
        assert_eq!(transcript, "mixed case");
    }
}
