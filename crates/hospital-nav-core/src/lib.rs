//! Hospital Navigator Core Library
//!
//! Client side of the hospital navigation service: room pair validation,
//! the HTTP path service client, microphone capture for voice commands,
//! and the controllers that drive an injected view.
//!
//! # Example
//!
//! ```no_run
//! use hospital_nav_core::{
//!     ControllerSettings, CoreResult, Endpoints, HttpPathService, PathRequestController,
//! };
//! # use hospital_nav_core::{BinaryImage, ImageRole, PathView, RoomIdentifier, VoiceStage};
//! # struct Stdout;
//! # impl PathView for Stdout {
//! #     fn alert(&self, m: &str) { println!("{m}") }
//! #     fn show_status(&self, m: &str) { println!("{m}") }
//! #     fn show_placeholder(&self, m: &str) { println!("{m}") }
//! #     fn show_path(&self, nodes: &[RoomIdentifier]) { println!("{nodes:?}") }
//! #     fn show_image(&self, _: &BinaryImage, _: ImageRole) {}
//! #     fn show_voice_stage(&self, _: VoiceStage) {}
//! # }
//!
//! use std::{sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let endpoints = Endpoints::new("http://127.0.0.1:5000")?;
//!     let service = Arc::new(HttpPathService::new(endpoints, Duration::from_secs(30))?);
//!     let controller =
//!         PathRequestController::new(service, Arc::new(Stdout), ControllerSettings::default());
//!
//!     controller.submit_path("Room 101", "Room 305").await?;
//!     Ok(())
//! }
//! ```

mod audio;
mod backend;
mod catalog;
mod controller;
mod error;
mod map_image;
mod response;
mod room;
mod view;

pub use {
    audio::{AudioClip, CLIP_FILE_NAME, CLIP_MIME_TYPE, CpalMicrophone, Microphone, RecordingSession},
    backend::{
        DEFAULT_BASE_URL, DEFAULT_GRAPH_IMAGE_ENDPOINT, DEFAULT_PATH_ENDPOINT,
        DEFAULT_VOICE_ENDPOINT, Endpoints, HttpPathService, PathService,
    },
    catalog::{FloorSummary, HealthStatus, RoomInfo, RoomQuery},
    controller::{
        AUTO_CLEAR_DELAY, ControllerSettings, GraphImageTask, NoticeStyle, PLACEHOLDER_TEXT,
        PROCESSING_TEXT, PROCESSING_VOICE_TEXT, PathRequestController, RECORDING_TEXT, Rendered,
        VoiceCommandController, VoiceStage, VoiceState,
    },
    error::{
        CONNECTION_FAILURE_MESSAGE, NavError, RequestFailure, Result as CoreResult,
        UNEXPECTED_RESPONSE_MESSAGE,
    },
    map_image::{BinaryImage, ImageRole},
    response::{PathResponse, PathRoute},
    room::{MISSING_ROOMS_MESSAGE, PathRequest, RoomIdentifier},
    view::PathView,
};

#[cfg(test)]
mod tests;
