use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Status shown while a path request is in flight.
pub const PROCESSING_TEXT: &str = "Calculating path...";
/// Text shown in the display region before any result.
pub const PLACEHOLDER_TEXT: &str = "Map will appear here";
/// Status shown while the microphone is open.
pub const RECORDING_TEXT: &str = "Recording... toggle again to stop";
/// Status shown while a voice upload is in flight.
pub const PROCESSING_VOICE_TEXT: &str = "Processing voice command...";

/// Delay used when auto-clear is switched on without an explicit value.
pub const AUTO_CLEAR_DELAY: Duration = Duration::from_secs(3);

/// How a validation failure is put in front of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeStyle {
    /// Modal alert.
    #[default]
    Alert,
    /// Status line in the display region.
    Inline,
}

/// Behaviour knobs shared by both controllers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Alert or inline status for blank room fields.
    pub validation_notice: NoticeStyle,
    /// Fetch the static map after a structured path is rendered.
    pub show_graph_after_route: bool,
    /// Revert to the placeholder this long after each submission renders.
    pub auto_clear: Option<Duration>,
    /// Status shown while a request is in flight.
    pub processing_text: String,
    /// Text the display reverts to.
    pub placeholder_text: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            validation_notice: NoticeStyle::Alert,
            show_graph_after_route: true,
            auto_clear: None,
            processing_text: PROCESSING_TEXT.to_string(),
            placeholder_text: PLACEHOLDER_TEXT.to_string(),
        }
    }
}
