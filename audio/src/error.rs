use thiserror::Error;

/// Errors returned by audio normalization.
#[derive(Debug, Error)]
pub enum AudioError {
    /// No decode strategy succeeded. Carries the direct-decode and
    /// permissive-fallback failure messages for diagnostics.
    #[error("unsupported audio: {direct} | {fallback}")]
    Unsupported { direct: String, fallback: String },

    #[error("audio is empty: decoded zero samples")]
    Empty,

    #[error("resample error: {0}")]
    Resample(String),
}
