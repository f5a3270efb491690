mod path;
pub(crate) mod render;
pub(crate) mod settings;
mod voice;
mod voice_state;

pub use {
    path::PathRequestController,
    render::{GraphImageTask, Rendered},
    settings::{
        AUTO_CLEAR_DELAY, ControllerSettings, NoticeStyle, PLACEHOLDER_TEXT, PROCESSING_TEXT,
        PROCESSING_VOICE_TEXT, RECORDING_TEXT,
    },
    voice::VoiceCommandController,
    voice_state::{VoiceStage, VoiceState},
};
