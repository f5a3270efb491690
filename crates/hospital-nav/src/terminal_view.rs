//! Terminal rendering of controller output.
//!
//! Text goes to stdout. Images are written to the cache directory and
//! handed to the system viewer. Voice stage changes are forwarded to the
//! tray on the main thread.

use crate::{AppResult, TrayCommand};

use std::{fmt::Write as _, fs, path::PathBuf, sync::Mutex};

use hospital_nav_core::{
    BinaryImage, FloorSummary, HealthStatus, ImageRole, PathView, RoomIdentifier, RoomInfo,
    VoiceStage,
};
use tao::event_loop::EventLoopProxy;
use tracing::{debug, instrument, warn};

/// `PathView` for the desktop binary.
pub struct TerminalView {
    image_dir: PathBuf,
    open_images: bool,
    tray: Option<Mutex<EventLoopProxy<TrayCommand>>>,
}

impl TerminalView {
    pub fn new(image_dir: PathBuf, open_images: bool) -> Self {
        Self {
            image_dir,
            open_images,
            tray: None,
        }
    }

    /// Forward voice stage changes to the tray icon.
    pub fn with_tray(mut self, proxy: EventLoopProxy<TrayCommand>) -> Self {
        self.tray = Some(Mutex::new(proxy));
        self
    }

    /// Write `image` under the image directory, replacing the previous one
    /// for the same role.
    #[instrument(skip(self, image), fields(byte_len = image.len()))]
    pub fn save_image(&self, image: &BinaryImage, role: ImageRole) -> AppResult<PathBuf> {
        let path = self.image_dir.join(image_file_name(image, role));
        fs::write(&path, image.bytes())?;
        debug!(path = ?path, "Image written");
        Ok(path)
    }

    pub fn show_rooms(&self, rooms: &[RoomInfo]) {
        println!("{}", format_rooms(rooms));
    }

    pub fn show_room_types(&self, room_types: &[String]) {
        println!("{}", format_room_types(room_types));
    }

    pub fn show_floors(&self, floors: &[FloorSummary]) {
        println!("{}", format_floors(floors));
    }

    pub fn show_health(&self, health: &HealthStatus) {
        println!("{}", format_health(health));
    }
}

impl PathView for TerminalView {
    fn alert(&self, message: &str) {
        println!("\n*** {} ***\n", message);
    }

    fn show_status(&self, message: &str) {
        println!("{}", message);
    }

    fn show_placeholder(&self, text: &str) {
        println!("[{}]", text);
    }

    fn show_path(&self, nodes: &[RoomIdentifier]) {
        println!("{}", format_path(nodes));
    }

    fn show_image(&self, image: &BinaryImage, role: ImageRole) {
        let path = match self.save_image(image, role) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Failed to save image");
                println!("Could not save {}", role_label(role));
                return;
            }
        };

        match image.dimensions() {
            Some((w, h)) => println!("{} ({}x{}): {}", role_label(role), w, h, path.display()),
            None => println!("{}: {}", role_label(role), path.display()),
        }

        if self.open_images {
            if let Err(e) = open::that(&path) {
                warn!(error = %e, path = ?path, "Failed to open image viewer");
            }
        }
    }

    fn show_voice_stage(&self, stage: VoiceStage) {
        let Some(tray) = &self.tray else {
            return;
        };

        let proxy = tray.lock().unwrap_or_else(|e| e.into_inner());
        if proxy.send_event(TrayCommand::SetStage(stage)).is_err() {
            debug!(stage = ?stage, "Tray event loop closed");
        }
    }
}

pub(crate) fn role_label(role: ImageRole) -> &'static str {
    match role {
        ImageRole::GraphMap => "Map",
        ImageRole::PathOverlay => "Path image",
    }
}

pub(crate) fn image_file_name(image: &BinaryImage, role: ImageRole) -> String {
    let stem = match role {
        ImageRole::GraphMap => "graph-map",
        ImageRole::PathOverlay => "path-overlay",
    };
    format!("{}.{}", stem, image.extension())
}

pub(crate) fn format_path(nodes: &[RoomIdentifier]) -> String {
    let mut out = String::from("Shortest Path:");
    for node in nodes {
        let _ = write!(out, "\n  \u{2022} {}", node);
    }
    out
}

pub(crate) fn format_rooms(rooms: &[RoomInfo]) -> String {
    if rooms.is_empty() {
        return "No rooms found".to_string();
    }

    let mut out = format!("{} room(s):", rooms.len());
    for room in rooms {
        let _ = write!(
            out,
            "\n  {:<10} {:<16} level {}",
            room.label(),
            room.room_type,
            room.level
        );
    }
    out
}

pub(crate) fn format_room_types(room_types: &[String]) -> String {
    if room_types.is_empty() {
        return "No room types".to_string();
    }
    format!("Room types: {}", room_types.join(", "))
}

pub(crate) fn format_floors(floors: &[FloorSummary]) -> String {
    if floors.is_empty() {
        return "No floors loaded".to_string();
    }

    let mut out = String::from("Floors:");
    for floor in floors {
        let _ = write!(
            out,
            "\n  level {}: {} room(s), types: {}",
            floor.level,
            floor.room_count,
            floor.room_types.join(", ")
        );
    }
    out
}

pub(crate) fn format_health(health: &HealthStatus) -> String {
    let verdict = if health.is_healthy() { "OK" } else { "DEGRADED" };
    format!(
        "Backend {}: status={}, graph_loaded={}, rooms={}, floors=[{}]",
        verdict,
        health.status,
        health.graph_loaded,
        health.total_rooms,
        health.floors_loaded.join(", ")
    )
}
