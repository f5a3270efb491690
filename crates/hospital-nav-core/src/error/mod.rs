use std::{fmt, panic::Location};

use error_location::ErrorLocation;
use thiserror::Error;

/// Generic text shown when the backend could not be reached or answered
/// with an error status.
pub const CONNECTION_FAILURE_MESSAGE: &str = "Error: Could not connect to the navigation server";

/// Text shown when the backend answered with a body in no known shape.
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Error: Unexpected response from the navigation server";

/// Why a request to the backend did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// Transport-level failure (connect, timeout, body read).
    Unreachable {
        /// Description from the HTTP client.
        detail: String,
    },
    /// Non-2xx status without a readable `error` body.
    Status {
        /// HTTP status code.
        code: u16,
    },
    /// The backend answered with a JSON `error` field.
    Backend {
        /// Message supplied by the backend.
        message: String,
    },
    /// The body could not be decoded into any known shape.
    Malformed {
        /// Decoder error description.
        detail: String,
    },
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::Unreachable { detail } => write!(f, "backend unreachable: {}", detail),
            RequestFailure::Status { code } => write!(f, "backend returned status {}", code),
            RequestFailure::Backend { message } => write!(f, "backend error: {}", message),
            RequestFailure::Malformed { detail } => write!(f, "malformed response: {}", detail),
        }
    }
}

/// Navigation client errors with source location tracking.
#[derive(Error, Debug)]
pub enum NavError {
    /// User input rejected before any network call.
    #[error("Validation failed: {reason} {location}")]
    Validation {
        /// Message suitable for showing to the user.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Microphone access was refused by the OS or the device.
    #[error("Microphone access denied: {reason} {location}")]
    PermissionDenied {
        /// Description of the refusal.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No audio input device found.
    #[error("No microphone found {location}")]
    NoMicrophoneFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recording stopped without any captured audio.
    #[error("No audio captured {location}")]
    NoAudioCaptured {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Captured audio could not be encoded for upload.
    #[error("Audio encoding failed: {reason} {location}")]
    EncodingFailed {
        /// Description of the encoder error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Backend request failed (network, status, or backend-reported error).
    #[error("Request failed: {failure} {location}")]
    RequestFailed {
        /// What went wrong.
        failure: RequestFailure,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Configured base URL or endpoint could not be parsed.
    #[error("Invalid endpoint {endpoint:?}: {reason} {location}")]
    InvalidEndpoint {
        /// The offending URL or path.
        endpoint: String,
        /// Parser error description.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A background task panicked or was cancelled.
    #[error("Background task failed: {reason} {location}")]
    TaskFailed {
        /// Join error description.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A voice command is still being processed.
    #[error("Voice command already in progress {location}")]
    Busy {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl NavError {
    /// Builds a [`NavError::RequestFailed`] at the caller's location.
    #[track_caller]
    pub fn request(failure: RequestFailure) -> Self {
        NavError::RequestFailed {
            failure,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Text to show the user, without source locations.
    pub fn user_message(&self) -> String {
        match self {
            NavError::Validation { reason, .. } => reason.clone(),
            NavError::PermissionDenied { reason, .. } => {
                format!("Microphone access denied: {}", reason)
            }
            NavError::NoMicrophoneFound { .. } => "No microphone found".to_string(),
            NavError::NoAudioCaptured { .. } => "No audio was recorded".to_string(),
            NavError::DeviceError { reason, .. } => format!("Microphone error: {}", reason),
            NavError::EncodingFailed { reason, .. } => {
                format!("Could not prepare recording: {}", reason)
            }
            NavError::RequestFailed {
                failure: RequestFailure::Backend { message },
                ..
            } => format!("Error: {}", message),
            NavError::RequestFailed {
                failure: RequestFailure::Malformed { .. },
                ..
            } => UNEXPECTED_RESPONSE_MESSAGE.to_string(),
            NavError::RequestFailed { .. } => CONNECTION_FAILURE_MESSAGE.to_string(),
            NavError::InvalidEndpoint { endpoint, .. } => {
                format!("Invalid server address: {}", endpoint)
            }
            NavError::TaskFailed { reason, .. } => format!("Background task failed: {}", reason),
            NavError::Busy { .. } => "Still processing the previous voice command".to_string(),
        }
    }
}

impl From<reqwest::Error> for NavError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        NavError::RequestFailed {
            failure: RequestFailure::Unreachable {
                detail: source.to_string(),
            },
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`NavError`].
pub type Result<T> = std::result::Result<T, NavError>;
