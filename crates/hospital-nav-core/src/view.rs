//! Display seam between the controllers and whatever renders them.

use crate::{BinaryImage, ImageRole, RoomIdentifier, VoiceStage};

/// Rendering surface the controllers drive.
///
/// Built once and injected into each controller; the controllers never
/// reach for global display state. Calls may come from spawned tasks, so
/// implementations must be shareable across threads.
pub trait PathView: Send + Sync + 'static {
    /// Blocking-style notice the user must acknowledge.
    fn alert(&self, message: &str);

    /// Inline status line, replacing the display region.
    fn show_status(&self, message: &str);

    /// Reset the display region to its idle placeholder.
    fn show_placeholder(&self, text: &str);

    /// Ordered list of path nodes.
    fn show_path(&self, nodes: &[RoomIdentifier]);

    /// Replace the image slot for `role` with `image`.
    fn show_image(&self, image: &BinaryImage, role: ImageRole);

    /// Voice controller changed stage.
    fn show_voice_stage(&self, stage: VoiceStage);
}
