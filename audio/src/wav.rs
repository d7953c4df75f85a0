//! Direct WAV decode and encode.
//!
//! First tier of the fallback chain: a self-describing RIFF/WAVE
//! container parsed with hound. Anything hound rejects moves the
//! chain on to transcoding.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;

use crate::canonical::Decoded;

#[derive(Debug, Error)]
pub enum WavError {
    #[error("wav parse: {0}")]
    Parse(String),

    #[error("wav write: {0}")]
    Write(String),

    #[error("wav: unsupported bit depth {0}")]
    BitDepth(u16),
}

/// Converts an i16 sample to f32 in [-1, 1).
pub fn i16_to_f32(s: i16) -> f32 {
    s as f32 / 32768.0
}

/// Converts an f32 sample in [-1, 1] to i16, clamping out-of-range values.
pub fn f32_to_i16(s: f32) -> i16 {
    (s * 32768.0).clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Parses WAV bytes into interleaved f32 samples.
pub(crate) fn decode(raw: &[u8]) -> Result<Decoded, WavError> {
    let mut reader =
        WavReader::new(Cursor::new(raw)).map_err(|e| WavError::Parse(e.to_string()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| WavError::Parse(e.to_string()))?,
        SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(i16_to_f32))
                .collect::<Result<_, _>>()
                .map_err(|e| WavError::Parse(e.to_string()))?,
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / i32::MAX as f32))
                .collect::<Result<_, _>>()
                .map_err(|e| WavError::Parse(e.to_string()))?,
            bits => return Err(WavError::BitDepth(bits)),
        },
    };

    Ok(Decoded {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Encodes mono f32 samples as a 16-bit PCM WAV byte buffer.
///
/// Used when handing canonical audio to capabilities that expect a
/// file-like WAV resource (cloud transcription).
pub fn encode_mono16(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, WavError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| WavError::Write(e.to_string()))?;
        for &s in samples {
            writer
                .write_sample(f32_to_i16(s))
                .map_err(|e| WavError::Write(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| WavError::Write(e.to_string()))?;
    }
    Ok(cursor.into_inner())
}
