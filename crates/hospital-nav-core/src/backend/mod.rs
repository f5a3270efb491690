mod endpoints;
mod http;

pub use {
    endpoints::{
        DEFAULT_BASE_URL, DEFAULT_GRAPH_IMAGE_ENDPOINT, DEFAULT_PATH_ENDPOINT,
        DEFAULT_VOICE_ENDPOINT, Endpoints,
    },
    http::HttpPathService,
};

use crate::{AudioClip, BinaryImage, CoreResult, PathRequest, PathResponse};

use std::future::Future;

/// Remote service that answers path queries and serves map images.
pub trait PathService: Send + Sync + 'static {
    /// Ask for a path between the two rooms of `request`.
    fn request_path(
        &self,
        request: &PathRequest,
    ) -> impl Future<Output = CoreResult<PathResponse>> + Send;

    /// Fetch the static map of the whole graph.
    fn graph_image(&self) -> impl Future<Output = CoreResult<BinaryImage>> + Send;

    /// Fetch the static map of one floor.
    fn level_image(&self, level: &str) -> impl Future<Output = CoreResult<BinaryImage>> + Send;

    /// Fetch an image the backend linked to instead of sending inline.
    fn fetch_image(&self, link: &str) -> impl Future<Output = CoreResult<BinaryImage>> + Send;

    /// Upload a recorded voice command.
    fn submit_voice(&self, clip: AudioClip)
    -> impl Future<Output = CoreResult<PathResponse>> + Send;
}
