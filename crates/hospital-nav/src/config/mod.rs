mod audio_config;
mod backend_config;
mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;

pub(crate) use {
    audio_config::AudioConfig, backend_config::BackendConfig, behaviour_config::BehaviourConfig,
    config::Config,
};

pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_OPEN_IMAGES: bool = true;

pub(crate) fn default_base_url() -> String {
    hospital_nav_core::DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_path_endpoint() -> String {
    hospital_nav_core::DEFAULT_PATH_ENDPOINT.to_string()
}

pub(crate) fn default_voice_endpoint() -> String {
    hospital_nav_core::DEFAULT_VOICE_ENDPOINT.to_string()
}

pub(crate) fn default_graph_image_endpoint() -> String {
    hospital_nav_core::DEFAULT_GRAPH_IMAGE_ENDPOINT.to_string()
}

pub(crate) fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

pub(crate) fn default_show_graph_after_route() -> bool {
    true
}

pub(crate) fn default_open_images() -> bool {
    DEFAULT_OPEN_IMAGES
}
