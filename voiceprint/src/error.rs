use thiserror::Error;

/// Errors returned by voice print operations.
#[derive(Debug, Error)]
pub enum VoiceprintError {
    /// Stored and fresh embeddings have different lengths. Indicates
    /// corrupted or incompatible enrollment data, not a transient fault.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A persisted print's byte length is not a multiple of the f32 width.
    #[error("invalid print encoding: {len} bytes is not a whole number of f32 values")]
    InvalidEncoding { len: usize },

    /// Similarity over an empty or all-zero vector is undefined.
    #[error("degenerate embedding: zero norm")]
    ZeroNorm,

    /// The embedding capability failed or returned a malformed result.
    #[error("inference error: {0}")]
    Inference(String),
}
