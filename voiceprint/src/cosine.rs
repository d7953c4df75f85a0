use crate::VoiceprintError;

/// Computes the cosine similarity between two vectors.
///
/// Returns a value in `[-1, 1]` where 1 means identical direction.
/// Uses f64 intermediate precision. Empty vectors, mismatched lengths,
/// and zero-norm vectors are errors rather than sentinel scores: a
/// security decision must never be made from an undefined comparison.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, VoiceprintError> {
    if a.len() != b.len() {
        return Err(VoiceprintError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    if a.is_empty() {
        return Err(VoiceprintError::ZeroNorm);
    }

    let mut dot: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;
    for i in 0..a.len() {
        let ai = a[i] as f64;
        let bi = b[i] as f64;
        dot += ai * bi;
        norm_a += ai * ai;
        norm_b += bi * bi;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(VoiceprintError::ZeroNorm);
    }

    // Clamp to [-1, 1] to absorb floating point drift.
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}
