//! Test doubles shared by the core test modules.

use crate::{
    AudioClip, BinaryImage, CoreResult, ImageRole, Microphone, NavError, PathRequest,
    PathResponse, PathRoute, PathService, PathView, RecordingSession, RequestFailure,
    RoomIdentifier, VoiceStage,
};

use std::{
    io::Cursor,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::Router;
use error_location::ErrorLocation;
use image::{ImageFormat, Rgba, RgbaImage};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Everything a controller asked the view to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewEvent {
    Alert(String),
    Status(String),
    Placeholder(String),
    Path(Vec<String>),
    Image { role: ImageRole, byte_len: usize },
    Stage(VoiceStage),
}

#[derive(Default)]
pub(crate) struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub(crate) fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub(crate) fn last(&self) -> Option<ViewEvent> {
        self.events().last().cloned()
    }

    fn push(&self, event: ViewEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl PathView for RecordingView {
    fn alert(&self, message: &str) {
        self.push(ViewEvent::Alert(message.to_string()));
    }

    fn show_status(&self, message: &str) {
        self.push(ViewEvent::Status(message.to_string()));
    }

    fn show_placeholder(&self, text: &str) {
        self.push(ViewEvent::Placeholder(text.to_string()));
    }

    fn show_path(&self, nodes: &[RoomIdentifier]) {
        self.push(ViewEvent::Path(
            nodes.iter().map(|n| n.as_str().to_string()).collect(),
        ));
    }

    fn show_image(&self, image: &BinaryImage, role: ImageRole) {
        self.push(ViewEvent::Image {
            role,
            byte_len: image.len(),
        });
    }

    fn show_voice_stage(&self, stage: VoiceStage) {
        self.push(ViewEvent::Stage(stage));
    }
}

/// Canned answer for [`FakePathService`].
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Route(Vec<&'static str>),
    Image(Vec<u8>),
    Link(&'static str),
    BackendError(&'static str),
    Unreachable,
}

impl Reply {
    fn build(&self) -> CoreResult<PathResponse> {
        match self {
            Reply::Route(nodes) => {
                let body = serde_json::json!({ "path": nodes });
                let route: PathRoute = serde_json::from_value(body).map_err(|e| {
                    NavError::request(RequestFailure::Malformed {
                        detail: e.to_string(),
                    })
                })?;
                Ok(PathResponse::Route(route))
            }
            Reply::Image(bytes) => Ok(PathResponse::Image(BinaryImage::new(
                bytes.clone(),
                Some("image/png".to_string()),
            ))),
            Reply::Link(link) => Ok(PathResponse::ImageLink(link.to_string())),
            Reply::BackendError(message) => Err(NavError::request(RequestFailure::Backend {
                message: message.to_string(),
            })),
            Reply::Unreachable => Err(NavError::request(RequestFailure::Unreachable {
                detail: "connection refused".to_string(),
            })),
        }
    }
}

/// In-memory path service that records every call.
pub(crate) struct FakePathService {
    reply: Mutex<Reply>,
    delay: Option<Duration>,
    graph_image: Vec<u8>,
    pub(crate) path_requests: Mutex<Vec<PathRequest>>,
    pub(crate) graph_calls: AtomicUsize,
    pub(crate) fetched_links: Mutex<Vec<String>>,
    pub(crate) voice_uploads: Mutex<Vec<AudioClip>>,
}

impl FakePathService {
    pub(crate) fn new(reply: Reply) -> Self {
        Self {
            reply: Mutex::new(reply),
            delay: None,
            graph_image: tiny_png(4, 4),
            path_requests: Mutex::new(Vec::new()),
            graph_calls: AtomicUsize::new(0),
            fetched_links: Mutex::new(Vec::new()),
            voice_uploads: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap_or_else(|e| e.into_inner()) = reply;
    }

    pub(crate) fn requests(&self) -> Vec<PathRequest> {
        self.path_requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn current_reply(&self) -> Reply {
        self.reply.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl PathService for FakePathService {
    async fn request_path(&self, request: &PathRequest) -> CoreResult<PathResponse> {
        self.path_requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        let reply = self.current_reply();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply.build()
    }

    async fn graph_image(&self) -> CoreResult<BinaryImage> {
        self.graph_calls.fetch_add(1, Ordering::SeqCst);
        Ok(BinaryImage::new(
            self.graph_image.clone(),
            Some("image/png".to_string()),
        ))
    }

    async fn level_image(&self, _level: &str) -> CoreResult<BinaryImage> {
        self.graph_image().await
    }

    async fn fetch_image(&self, link: &str) -> CoreResult<BinaryImage> {
        self.fetched_links
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(link.to_string());
        Ok(BinaryImage::new(tiny_png(2, 2), None))
    }

    async fn submit_voice(&self, clip: AudioClip) -> CoreResult<PathResponse> {
        self.voice_uploads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(clip);
        let reply = self.current_reply();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply.build()
    }
}

/// Microphone double with shared call counters.
pub(crate) struct MockMicrophone {
    pub(crate) starts: Arc<AtomicUsize>,
    pub(crate) stops: Arc<AtomicUsize>,
    deny: bool,
    chunks: Vec<Vec<f32>>,
    session: Option<RecordingSession>,
}

impl MockMicrophone {
    pub(crate) fn with_chunks(chunks: Vec<Vec<f32>>) -> Self {
        Self {
            starts: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
            deny: false,
            chunks,
            session: None,
        }
    }

    pub(crate) fn denied() -> Self {
        Self {
            deny: true,
            ..Self::with_chunks(Vec::new())
        }
    }
}

impl Microphone for MockMicrophone {
    fn start(&mut self, session_id: Uuid) -> CoreResult<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.deny {
            return Err(NavError::PermissionDenied {
                reason: "user refused".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        let mut session = RecordingSession::new(session_id, 16_000, 1);
        for chunk in &self.chunks {
            session.push_chunk(chunk);
        }
        self.session = Some(session);
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<RecordingSession> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.session.take().ok_or(NavError::DeviceError {
            reason: "not recording".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Encode a solid RGBA image as PNG bytes.
pub(crate) fn tiny_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([0, 115, 230, 255]));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png)
        .unwrap_or_default();
    cursor.into_inner()
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub(crate) async fn spawn_backend(app: Router) -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}", addr))
}
