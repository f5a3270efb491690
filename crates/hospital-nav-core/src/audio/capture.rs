use crate::{CoreResult, Microphone, NavError, RecordingSession};

use std::{
    panic::Location,
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    BuildStreamError, Device, PlayStreamError, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Microphone backed by a cpal input stream.
pub struct CpalMicrophone {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    session: Arc<Mutex<RecordingSession>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback appends after `stop()`
    /// takes the session.
    shutdown: Arc<AtomicBool>,
}

impl CpalMicrophone {
    /// Open the named input device, or the host default when `device_name`
    /// is `None` or no device matches.
    #[track_caller]
    #[instrument]
    pub fn new(device_name: Option<&str>) -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = match device_name {
            Some(name) => Self::find_device(&host, name).or_else(|| {
                warn!(device = name, "Configured input device not found, using default");
                host.default_input_device()
            }),
            None => host.default_input_device(),
        }
        .ok_or(NavError::NoMicrophoneFound {
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config = device
            .default_input_config()
            .map_err(|e| NavError::DeviceError {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "Microphone initialized"
        );

        let config: StreamConfig = config.into();
        let session = RecordingSession::new(Uuid::nil(), config.sample_rate, config.channels);

        Ok(Self {
            device,
            config,
            stream: None,
            session: Arc::new(Mutex::new(session)),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    #[allow(deprecated)]
    fn find_device(host: &cpal::Host, name: &str) -> Option<Device> {
        host.input_devices()
            .ok()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
    }

    /// Device sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }
}

impl Microphone for CpalMicrophone {
    #[track_caller]
    #[instrument(skip(self))]
    fn start(&mut self, session_id: Uuid) -> CoreResult<()> {
        if self.stream.is_some() {
            return Err(NavError::DeviceError {
                reason: "Capture already running".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let session = Arc::clone(&self.session);
        let shutdown = Arc::clone(&self.shutdown);

        self.shutdown.store(false, Ordering::Release);

        *self.session.lock().map_err(|e| NavError::DeviceError {
            reason: format!("Failed to lock session: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })? = RecordingSession::new(session_id, self.config.sample_rate, self.config.channels);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // A poisoned lock still holds valid chunks.
                    let mut session = session.lock().unwrap_or_else(|e| {
                        error!("Session lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    session.push_chunk(data);
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| match e {
                BuildStreamError::DeviceNotAvailable => NavError::PermissionDenied {
                    reason: "Input device not available".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                other => NavError::PermissionDenied {
                    reason: format!("Failed to open input stream: {}", other),
                    location: ErrorLocation::from(Location::caller()),
                },
            })?;

        stream.play().map_err(|e| match e {
            PlayStreamError::DeviceNotAvailable => NavError::PermissionDenied {
                reason: "Input device not available".to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            other => NavError::DeviceError {
                reason: format!("Failed to start stream: {}", other),
                location: ErrorLocation::from(Location::caller()),
            },
        })?;

        self.stream = Some(stream);
        info!(session_id = %session_id, "Audio capture started");

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn stop(&mut self) -> CoreResult<RecordingSession> {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Let a callback that raced the flag finish before the swap.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Audio capture stopped, microphone released");
        }

        let mut guard = self.session.lock().map_err(|e| NavError::DeviceError {
            reason: format!("Failed to lock session: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let empty = RecordingSession::new(Uuid::nil(), self.config.sample_rate, self.config.channels);
        let session = std::mem::replace(&mut *guard, empty);

        debug!(
            session_id = %session.session_id(),
            chunk_count = session.chunk_count(),
            sample_count = session.sample_count(),
            "Captured audio chunks"
        );

        Ok(session)
    }
}
