use crate::{CLIP_FILE_NAME, CLIP_MIME_TYPE, NavError, RecordingSession};

use std::io::Cursor;

use uuid::Uuid;

/// WHAT: Chunks keep arrival order
/// WHY: Reordering audio would garble the voice command
#[test]
fn given_several_chunks_when_pushing_then_order_preserved() {
    // Given: A fresh session
    let mut session = RecordingSession::new(Uuid::new_v4(), 16_000, 1);

    // When: Pushing three chunks and one empty callback
    session.push_chunk(&[0.1, 0.2]);
    session.push_chunk(&[]);
    session.push_chunk(&[0.3]);
    session.push_chunk(&[0.4, 0.5, 0.6]);

    // Then: Empty callbacks are skipped, order kept
    assert_eq!(session.chunk_count(), 3);
    assert_eq!(session.sample_count(), 6);
    assert_eq!(session.chunks()[1], vec![0.3]);
}

/// WHAT: Finalizing produces a readable WAV clip
/// WHY: The voice endpoint expects a standard audio file
#[test]
#[allow(clippy::unwrap_used)]
fn given_recorded_chunks_when_finalizing_then_wav_clip_with_all_samples() {
    // Given: A stereo session with four frames across two chunks
    let session_id = Uuid::new_v4();
    let mut session = RecordingSession::new(session_id, 44_100, 2);
    session.push_chunk(&[0.0, 0.5, -0.5, 1.0]);
    session.push_chunk(&[2.0, -2.0, 0.25, -0.25]);

    // When: Finalizing
    let clip = session.finalize().unwrap();

    // Then: RIFF/WAVE header and every sample, clamped to 16-bit range
    assert_eq!(&clip.bytes()[0..4], b"RIFF");
    assert_eq!(&clip.bytes()[8..12], b"WAVE");
    assert_eq!(clip.session_id(), session_id);
    assert_eq!(clip.file_name(), CLIP_FILE_NAME);
    assert_eq!(clip.mime_type(), CLIP_MIME_TYPE);

    let mut reader = hound::WavReader::new(Cursor::new(clip.bytes().to_vec())).unwrap();
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.spec().sample_rate, 44_100);
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), 8);
    assert_eq!(samples[3], i16::MAX);
    assert_eq!(samples[4], i16::MAX);
    assert_eq!(samples[5], -i16::MAX);
}

/// WHAT: Empty session cannot be finalized
/// WHY: Uploading silence wastes a backend transcription
#[test]
fn given_empty_session_when_finalizing_then_no_audio_captured() {
    // Given: A session with no chunks
    let session = RecordingSession::new(Uuid::new_v4(), 16_000, 1);

    // When/Then: NoAudioCaptured
    assert!(matches!(
        session.finalize(),
        Err(NavError::NoAudioCaptured { .. })
    ));
}
