//! External transcode tier.
//!
//! Second tier of the fallback chain: hand the upload to an external
//! transcoder (ffmpeg by default) forced to emit mono 16 kHz WAV, then
//! decode its output. Scratch files live in a per-call temp directory
//! that is removed on every exit path.

use std::path::PathBuf;
use std::process::Command;

use thiserror::Error;

use crate::canonical::Decoded;
use crate::canonical::SAMPLE_RATE;
use crate::wav;

/// How much transcoder stderr to keep in error messages.
const STDERR_TAIL: usize = 512;

#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The transcoder binary is not installed or not on PATH.
    #[error("transcoder unavailable: {0}")]
    Unavailable(String),

    #[error("transcoder exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("transcoder output unreadable: {0}")]
    Output(String),

    #[error("transcoder io: {0}")]
    Io(#[from] std::io::Error),
}

/// Invokes an external transcoder to rescue containers the direct
/// decoder rejects.
#[derive(Debug, Clone)]
pub struct Transcoder {
    command: PathBuf,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder {
    /// Creates a transcoder invoking the given command, resolved via
    /// PATH unless absolute.
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Transcodes raw bytes to mono 16 kHz WAV and decodes the result.
    pub(crate) fn transcode(&self, raw: &[u8]) -> Result<Decoded, TranscodeError> {
        // Scratch directory is dropped (and deleted) on all paths.
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("upload.bin");
        let output = scratch.path().join("out.wav");
        std::fs::write(&input, raw)?;

        let result = Command::new(&self.command)
            .arg("-y")
            .arg("-i")
            .arg(&input)
            .args(["-ac", "1"])
            .args(["-ar", &SAMPLE_RATE.to_string()])
            .arg(&output)
            .output();

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TranscodeError::Unavailable(
                    self.command.display().to_string(),
                ));
            }
            Err(e) => return Err(TranscodeError::Io(e)),
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            // The cut point must land on a char boundary; lossy decoding
            // of localized transcoder output yields multi-byte chars.
            let mut idx = stderr.len().saturating_sub(STDERR_TAIL);
            while !stderr.is_char_boundary(idx) {
                idx += 1;
            }
            return Err(TranscodeError::Failed {
                status: out.status.code().unwrap_or(-1),
                stderr: stderr[idx..].trim().to_string(),
            });
        }

        let converted = std::fs::read(&output)?;
        wav::decode(&converted).map_err(|e| TranscodeError::Output(e.to_string()))
    }
}
