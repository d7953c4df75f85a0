//! Permissive multi-format decode tier.
//!
//! Last tier of the fallback chain: symphonia's probe accepts a wider
//! range of containers (mp3, m4a/aac, ogg/vorbis, flac, and malformed
//! WAV variants) than the strict direct decoder. The first audio track
//! is decoded packet by packet and downmixed to mono on the fly.

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use crate::canonical::Decoded;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("probe failed: {0}")]
    Probe(String),

    #[error("no audio track found")]
    NoTrack,

    #[error("codec init failed: {0}")]
    Codec(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("no audio samples decoded")]
    NoSamples,
}

/// Best-effort decode of arbitrary container bytes to mono samples at
/// the source rate.
pub(crate) fn decode_any(raw: &[u8]) -> Result<Decoded, DecodeError> {
    let cursor = std::io::Cursor::new(raw.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Probe(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;

    let codec_params = track.codec_params.clone();
    let track_id = track.id;
    let sample_rate = codec_params.sample_rate.unwrap_or(crate::SAMPLE_RATE);
    let channels = codec_params.channels.map_or(1, |c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Codec(e.to_string()))?;

    let mut mono: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(DecodeError::Decode(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| DecodeError::Decode(e.to_string()))?;
        let spec = *decoded.spec();
        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);

        if channels > 1 {
            for frame in buf.samples().chunks(channels) {
                mono.push(frame.iter().sum::<f32>() / channels as f32);
            }
        } else {
            mono.extend_from_slice(buf.samples());
        }
    }

    if mono.is_empty() {
        return Err(DecodeError::NoSamples);
    }

    Ok(Decoded {
        samples: mono,
        sample_rate,
        channels: 1,
    })
}
