use crate::{CoreResult, NavError};

use std::{io::Cursor, panic::Location};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, instrument};
use uuid::Uuid;

/// File name used for the multipart upload.
pub const CLIP_FILE_NAME: &str = "recording.wav";

/// MIME type of an encoded clip.
pub const CLIP_MIME_TYPE: &str = "audio/wav";

/// Audio captured between start and stop of one voice command.
///
/// Chunks are kept in arrival order, interleaved across channels.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    session_id: Uuid,
    sample_rate: u32,
    channels: u16,
    chunks: Vec<Vec<f32>>,
}

impl RecordingSession {
    /// Empty session for one recording.
    pub fn new(session_id: Uuid, sample_rate: u32, channels: u16) -> Self {
        Self {
            session_id,
            sample_rate,
            channels,
            chunks: Vec::new(),
        }
    }

    /// Append one capture callback's worth of samples.
    pub fn push_chunk(&mut self, data: &[f32]) {
        if !data.is_empty() {
            self.chunks.push(data.to_vec());
        }
    }

    /// Identifier shared by the session and its clip.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Capture sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Interleaved channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Captured chunks in arrival order.
    pub fn chunks(&self) -> &[Vec<f32>] {
        &self.chunks
    }

    /// Number of captured chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total samples across all chunks.
    pub fn sample_count(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Encode all chunks, in order, as a 16-bit PCM WAV clip.
    ///
    /// # Errors
    ///
    /// Returns `NoAudioCaptured` if nothing was recorded.
    #[track_caller]
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn finalize(self) -> CoreResult<AudioClip> {
        let sample_count = self.sample_count();
        if sample_count == 0 {
            return Err(NavError::NoAudioCaptured {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let spec = WavSpec {
            channels: self.channels.max(1),
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        // 44-byte RIFF header plus two bytes per sample.
        let mut cursor = Cursor::new(Vec::with_capacity(44 + sample_count * 2));
        {
            let mut writer = WavWriter::new(&mut cursor, spec).map_err(|e| {
                NavError::EncodingFailed {
                    reason: format!("Failed to start WAV stream: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

            for sample in self.chunks.iter().flatten() {
                let pcm = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
                writer
                    .write_sample(pcm)
                    .map_err(|e| NavError::EncodingFailed {
                        reason: format!("Failed to write sample: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    })?;
            }

            writer.finalize().map_err(|e| NavError::EncodingFailed {
                reason: format!("Failed to finalize WAV stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        let bytes = cursor.into_inner();

        debug!(
            chunk_count = self.chunks.len(),
            sample_count,
            byte_len = bytes.len(),
            "Recording finalized"
        );

        Ok(AudioClip {
            session_id: self.session_id,
            bytes,
        })
    }
}

/// Encoded recording ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    session_id: Uuid,
    bytes: Vec<u8>,
}

impl AudioClip {
    /// Wrap encoded WAV bytes for upload.
    pub fn new(session_id: Uuid, bytes: Vec<u8>) -> Self {
        Self { session_id, bytes }
    }

    /// Session the clip was recorded in.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Encoded WAV bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// File name sent with the multipart upload.
    pub fn file_name(&self) -> &'static str {
        CLIP_FILE_NAME
    }

    /// MIME type sent with the multipart upload.
    pub fn mime_type(&self) -> &'static str {
        CLIP_MIME_TYPE
    }
}
