mod capture;
mod microphone;
mod recording;

pub use {
    capture::CpalMicrophone,
    microphone::Microphone,
    recording::{AudioClip, CLIP_FILE_NAME, CLIP_MIME_TYPE, RecordingSession},
};
