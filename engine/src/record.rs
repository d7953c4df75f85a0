use serde::{Deserialize, Serialize};
use voxauth_voiceprint::{VoicePrint, VoiceprintError};

use crate::EngineError;

/// The per-user reference created at enrollment.
///
/// `print` is the voice print in its wire form: raw little-endian f32
/// bytes, length = dimension x 4. `phrase` is the transcript captured
/// at enrollment, already lowercased and trimmed. Records are replaced
/// wholesale on re-registration; no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub user_id: String,
    pub print: Vec<u8>,
    pub phrase: String,
}

impl EnrollmentRecord {
    pub fn new(user_id: &str, print: &VoicePrint, phrase: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            print: print.to_bytes(),
            phrase: phrase.to_string(),
        }
    }

    /// Reconstructs the stored voice print from its byte representation.
    pub fn voice_print(&self) -> Result<VoicePrint, VoiceprintError> {
        VoicePrint::from_bytes(&self.print)
    }

    /// Serializes the record for the enrollment store.
    pub fn to_store_bytes(&self) -> Result<Vec<u8>, EngineError> {
        serde_json::to_vec(self).map_err(|e| EngineError::Record(e.to_string()))
    }

    /// Parses a record previously written with [`to_store_bytes`].
    ///
    /// [`to_store_bytes`]: EnrollmentRecord::to_store_bytes
    pub fn from_store_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        serde_json::from_slice(bytes).map_err(|e| EngineError::Record(e.to_string()))
    }
}
