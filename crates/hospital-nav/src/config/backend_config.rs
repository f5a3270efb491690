use crate::config::{
    default_base_url, default_graph_image_endpoint, default_path_endpoint,
    default_request_timeout_secs, default_voice_endpoint,
};

use serde::{Deserialize, Serialize};

/// Navigation backend location and routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Scheme, host, and port of the backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Route accepting `{start, end}` path queries.
    #[serde(default = "default_path_endpoint")]
    pub path_endpoint: String,

    /// Route accepting multipart voice uploads.
    #[serde(default = "default_voice_endpoint")]
    pub voice_endpoint: String,

    /// Route serving the whole-graph map image.
    #[serde(default = "default_graph_image_endpoint")]
    pub graph_image_endpoint: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path_endpoint: default_path_endpoint(),
            voice_endpoint: default_voice_endpoint(),
            graph_image_endpoint: default_graph_image_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
