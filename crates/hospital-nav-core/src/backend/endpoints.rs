use crate::{CoreResult, NavError};

use std::panic::Location;

use error_location::ErrorLocation;
use url::Url;

/// Local development server.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
/// Structured path query route.
pub const DEFAULT_PATH_ENDPOINT: &str = "/shortest-path";
/// Voice upload route.
pub const DEFAULT_VOICE_ENDPOINT: &str = "/voice_path";
/// Static map route. Floor maps live under `<route>/<level>`.
pub const DEFAULT_GRAPH_IMAGE_ENDPOINT: &str = "/graph-image";

/// Where each backend operation lives.
///
/// Paths are resolved against `base_url`, so absolute paths replace any
/// path component of the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: Url,
    path: String,
    voice: String,
    graph_image: String,
}

impl Endpoints {
    /// Default routes under `base_url`.
    ///
    /// # Errors
    ///
    /// [`NavError::InvalidEndpoint`] if `base_url` is not an absolute URL.
    #[track_caller]
    pub fn new(base_url: &str) -> CoreResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| NavError::InvalidEndpoint {
            endpoint: base_url.to_string(),
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            base_url,
            path: DEFAULT_PATH_ENDPOINT.to_string(),
            voice: DEFAULT_VOICE_ENDPOINT.to_string(),
            graph_image: DEFAULT_GRAPH_IMAGE_ENDPOINT.to_string(),
        })
    }

    /// Use a different path-query route, e.g. `/get_path`.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Use a different voice upload route.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Use a different static map route.
    pub fn with_graph_image(mut self, graph_image: impl Into<String>) -> Self {
        self.graph_image = graph_image.into();
        self
    }

    /// Parsed base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Path query route.
    pub fn path_url(&self) -> CoreResult<Url> {
        self.resolve(&self.path)
    }

    /// Voice upload route.
    pub fn voice_url(&self) -> CoreResult<Url> {
        self.resolve(&self.voice)
    }

    /// Static map route.
    pub fn graph_image_url(&self) -> CoreResult<Url> {
        self.resolve(&self.graph_image)
    }

    /// Map of one floor, nested under the static map route.
    pub fn level_image_url(&self, level: &str) -> CoreResult<Url> {
        let base = self.graph_image.trim_end_matches('/');
        self.resolve(&format!("{}/{}", base, level.trim()))
    }

    /// Resolve a route or backend-supplied link. Absolute URLs pass through.
    #[track_caller]
    pub fn resolve(&self, link: &str) -> CoreResult<Url> {
        self.base_url
            .join(link)
            .map_err(|e| NavError::InvalidEndpoint {
                endpoint: link.to_string(),
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
