use crate::{VoiceprintError, cosine_similarity};

/// A fixed-length speaker embedding.
///
/// Treated as opaque except for its dimensionality. The persisted form
/// is raw little-endian f32 bytes, length = dimension x 4, matching the
/// enrollment store contract.
#[derive(Debug, Clone, PartialEq)]
pub struct VoicePrint {
    values: Vec<f32>,
}

impl VoicePrint {
    pub fn from_vec(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Decodes a print from its persisted byte representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VoiceprintError> {
        if bytes.len() % 4 != 0 {
            return Err(VoiceprintError::InvalidEncoding { len: bytes.len() });
        }
        let values = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(Self { values })
    }

    /// Encodes the print as raw little-endian f32 bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.values.len() * 4);
        for v in &self.values {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Cosine similarity against another print, in [-1, 1].
    /// Fails on dimension mismatch or degenerate vectors.
    pub fn similarity(&self, other: &VoicePrint) -> Result<f64, VoiceprintError> {
        cosine_similarity(&self.values, &other.values)
    }
}
