//! reqwest-backed path service and room catalog client.

use crate::{
    AudioClip, BinaryImage, CoreResult, Endpoints, FloorSummary, HealthStatus, NavError,
    PathRequest, PathResponse, PathService, RequestFailure, RoomInfo, RoomQuery,
    catalog::{FloorsBody, RoomTypesBody, RoomsBody, SearchBody},
    response::ErrorBody,
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use reqwest::{
    Client, Response, StatusCode,
    header::CONTENT_TYPE,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

/// HTTP client for the navigation backend.
#[derive(Debug, Clone)]
pub struct HttpPathService {
    http: Client,
    endpoints: Endpoints,
}

impl HttpPathService {
    /// Build a client with a per-request timeout.
    #[track_caller]
    #[instrument(skip(endpoints), fields(base_url = %endpoints.base_url()))]
    pub fn new(endpoints: Endpoints, timeout: Duration) -> CoreResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        info!(timeout_ms = timeout.as_millis(), "Backend client initialized");

        Ok(Self { http, endpoints })
    }

    /// Routes this client talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// All rooms known to the backend.
    #[instrument(skip(self))]
    pub async fn rooms(&self) -> CoreResult<Vec<RoomInfo>> {
        let url = self.endpoints.resolve("/api/rooms")?;
        let body: RoomsBody = self.get_json(url, &[]).await?;
        Ok(body.rooms)
    }

    /// Rooms on one floor.
    #[instrument(skip(self))]
    pub async fn rooms_on_level(&self, level: &str) -> CoreResult<Vec<RoomInfo>> {
        let level = level.trim();
        let url = self.endpoints.resolve(&format!("/api/rooms/{}", level))?;
        let body: RoomsBody = self.get_json(url, &[]).await?;
        Ok(body
            .rooms
            .into_iter()
            .map(|room| RoomInfo {
                level: level.to_string(),
                ..room
            })
            .collect())
    }

    /// Sorted list of room types.
    #[instrument(skip(self))]
    pub async fn room_types(&self) -> CoreResult<Vec<String>> {
        let url = self.endpoints.resolve("/api/room-types")?;
        let body: RoomTypesBody = self.get_json(url, &[]).await?;
        Ok(body.room_types)
    }

    /// Rooms of one type, matched case-insensitively by the backend.
    #[instrument(skip(self))]
    pub async fn rooms_of_type(&self, room_type: &str) -> CoreResult<Vec<RoomInfo>> {
        let url = self
            .endpoints
            .resolve(&format!("/api/room-types/{}", room_type.trim()))?;
        let body: RoomsBody = self.get_json(url, &[]).await?;
        Ok(body.rooms)
    }

    /// Search rooms. The backend caps results at 50.
    #[instrument(skip(self))]
    pub async fn search_rooms(&self, query: &RoomQuery) -> CoreResult<Vec<RoomInfo>> {
        let url = self.endpoints.resolve("/api/search-rooms")?;
        let body: SearchBody = self.get_json(url, &query.params()).await?;
        Ok(body.results)
    }

    /// Per-floor room counts and types.
    #[instrument(skip(self))]
    pub async fn floors(&self) -> CoreResult<Vec<FloorSummary>> {
        let url = self.endpoints.resolve("/api/floors")?;
        let body: FloorsBody = self.get_json(url, &[]).await?;
        Ok(body.floors)
    }

    /// Backend readiness report.
    #[instrument(skip(self))]
    pub async fn health(&self) -> CoreResult<HealthStatus> {
        let url = self.endpoints.resolve("/api/health")?;
        self.get_json(url, &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> CoreResult<T> {
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(failure_from_status(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(err) => NavError::request(RequestFailure::Backend { message: err.error }),
            Err(_) => NavError::request(RequestFailure::Malformed {
                detail: e.to_string(),
            }),
        })
    }

    async fn get_image(&self, url: Url) -> CoreResult<BinaryImage> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let content_type = content_type(&response);
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(failure_from_status(status, &body));
        }

        if content_type.as_deref().is_some_and(is_json) {
            if let Ok(err) = serde_json::from_slice::<ErrorBody>(&body) {
                return Err(NavError::request(RequestFailure::Backend {
                    message: err.error,
                }));
            }
        }

        let image = BinaryImage::new(body.to_vec(), content_type);
        debug!(byte_len = image.len(), dimensions = ?image.dimensions(), "Image fetched");
        Ok(image)
    }
}

impl PathService for HttpPathService {
    #[instrument(skip(self, request), fields(request_id = %Uuid::new_v4(), start = %request.start(), end = %request.end()))]
    async fn request_path(&self, request: &PathRequest) -> CoreResult<PathResponse> {
        let url = self.endpoints.path_url()?;
        let start = std::time::Instant::now();

        let response = self.http.post(url).json(request).send().await?;
        let result = read_path_response(response).await;

        match &result {
            Ok(_) => info!(duration_ms = start.elapsed().as_millis(), "Path response received"),
            Err(e) => warn!(error = %e, "Path request failed"),
        }

        result
    }

    #[instrument(skip(self))]
    async fn graph_image(&self) -> CoreResult<BinaryImage> {
        let url = self.endpoints.graph_image_url()?;
        self.get_image(url).await
    }

    #[instrument(skip(self))]
    async fn level_image(&self, level: &str) -> CoreResult<BinaryImage> {
        let url = self.endpoints.level_image_url(level)?;
        self.get_image(url).await
    }

    #[instrument(skip(self))]
    async fn fetch_image(&self, link: &str) -> CoreResult<BinaryImage> {
        let url = self.endpoints.resolve(link)?;
        self.get_image(url).await
    }

    #[instrument(skip(self, clip), fields(session_id = %clip.session_id(), byte_len = clip.bytes().len()))]
    async fn submit_voice(&self, clip: AudioClip) -> CoreResult<PathResponse> {
        let url = self.endpoints.voice_url()?;
        let file_name = clip.file_name();
        let mime_type = clip.mime_type();

        let part = Part::bytes(clip.into_bytes())
            .file_name(file_name)
            .mime_str(mime_type)?;
        let form = Form::new().part("audio", part);

        let response = self.http.post(url).multipart(form).send().await?;
        read_path_response(response).await
    }
}

async fn read_path_response(response: Response) -> CoreResult<PathResponse> {
    let status = response.status();
    let content_type = content_type(&response);
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(failure_from_status(status, &body));
    }

    if content_type.as_deref().is_some_and(|ct| ct.starts_with("image/")) {
        return Ok(PathResponse::Image(BinaryImage::new(body.to_vec(), content_type)));
    }

    PathResponse::from_json(&body)
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
}

fn is_json(content_type: &str) -> bool {
    content_type.starts_with("application/json")
}

/// Non-2xx: prefer the backend's own `error` message when the body has one.
#[track_caller]
fn failure_from_status(status: StatusCode, body: &[u8]) -> NavError {
    let failure = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(err) => RequestFailure::Backend { message: err.error },
        Err(_) => RequestFailure::Status {
            code: status.as_u16(),
        },
    };

    NavError::RequestFailed {
        failure,
        location: ErrorLocation::from(Location::caller()),
    }
}
