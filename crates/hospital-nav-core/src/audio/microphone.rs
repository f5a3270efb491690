use crate::{CoreResult, RecordingSession};

use uuid::Uuid;

/// Exclusive handle on an audio input device.
///
/// `start` acquires the device and begins appending chunks to a fresh
/// [`RecordingSession`]; `stop` releases the device and hands the session
/// back. Implementations must release the device on every `stop` call,
/// including ones that return an error.
pub trait Microphone: Send + 'static {
    /// Acquire the device and start capturing.
    fn start(&mut self, session_id: Uuid) -> CoreResult<()>;

    /// Release the device and return everything captured since `start`.
    fn stop(&mut self) -> CoreResult<RecordingSession>;
}
