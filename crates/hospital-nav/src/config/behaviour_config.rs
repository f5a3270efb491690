use crate::config::{default_open_images, default_show_graph_after_route};

use hospital_nav_core::NoticeStyle;
use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// `alert` or `inline` for missing room input.
    #[serde(default)]
    pub validation_notice: NoticeStyle,

    /// Fetch the whole map after a path list is shown.
    #[serde(default = "default_show_graph_after_route")]
    pub show_graph_after_route: bool,

    /// Revert to the placeholder after each result.
    #[serde(default)]
    pub auto_clear: bool,

    /// Auto-clear delay in seconds.
    #[serde(default)]
    pub auto_clear_secs: Option<u64>,

    /// Open received images in the system viewer.
    #[serde(default = "default_open_images")]
    pub open_images: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            validation_notice: NoticeStyle::default(),
            show_graph_after_route: default_show_graph_after_route(),
            auto_clear: false,
            auto_clear_secs: None,
            open_images: default_open_images(),
        }
    }
}
