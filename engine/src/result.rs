use serde::Serialize;

/// Outcome of one verification attempt.
///
/// Success carries both match flags, the rounded similarity score and
/// both phrases, so an auditor can see the evidence even though only
/// `speaker_match` drives the binary outcome. Failures carry `error`
/// with `verified: false` and omit the diagnostic fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_match: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoken_phrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_phrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResult {
    /// A completed comparison.
    pub fn decided(
        speaker_match: bool,
        phrase_match: bool,
        similarity_score: f64,
        spoken_phrase: String,
        expected_phrase: String,
    ) -> Self {
        Self {
            // Speaker similarity alone gates the decision; phrase_match
            // is reported for callers that enforce it themselves.
            verified: speaker_match,
            speaker_match: Some(speaker_match),
            phrase_match: Some(phrase_match),
            similarity_score: Some(similarity_score),
            spoken_phrase: Some(spoken_phrase),
            expected_phrase: Some(expected_phrase),
            error: None,
        }
    }

    /// A failed attempt: not verified, with a diagnostic message.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            verified: false,
            speaker_match: None,
            phrase_match: None,
            similarity_score: None,
            spoken_phrase: None,
            expected_phrase: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationResult {
    pub message: String,
    pub stored_phrase: String,
    pub verified: bool,
}

/// Dependency availability for health reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependencies {
    pub store: bool,
    pub encoder_dimension: usize,
    pub transcription_providers: Vec<String>,
}

/// Service health summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub dependencies: Dependencies,
}
