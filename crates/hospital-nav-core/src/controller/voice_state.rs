use std::time::Instant;

use uuid::Uuid;

/// State of the voice command controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    /// Not recording.
    Idle,
    /// Capturing audio.
    Recording {
        /// When recording started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
    /// Uploading the finished recording and waiting for the answer.
    Processing {
        /// Session being processed.
        session_id: Uuid,
    },
}

impl VoiceState {
    /// Stage without the session data.
    pub fn stage(&self) -> VoiceStage {
        match self {
            VoiceState::Idle => VoiceStage::Idle,
            VoiceState::Recording { .. } => VoiceStage::Recording,
            VoiceState::Processing { .. } => VoiceStage::Processing,
        }
    }
}

/// Data-free view of [`VoiceState`] for displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceStage {
    /// Ready to record.
    Idle,
    /// Currently recording audio.
    Recording,
    /// Uploading and waiting for the backend.
    Processing,
}
