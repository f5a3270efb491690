//! System tray icon with voice-stage updates.
//!
//! Manages a system tray icon with three states (Idle, Recording, Processing)
//! and a context menu with Show map and Exit.

use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use hospital_nav_core::VoiceStage;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

pub(crate) const ICON_SIZE: u32 = 32;

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    show_map_item_id: MenuId,
    exit_item_id: MenuId,
}

impl TrayManager {
    /// Create a new tray manager in the idle state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let show_map_item = MenuItem::new("Show map", true, None);
        let exit_item = MenuItem::new("Exit", true, None);

        let show_map_id = show_map_item.id().clone();
        let exit_id = exit_item.id().clone();

        menu.append(&show_map_item).map_err(|e| AppError::TrayError {
            reason: format!("Failed to add show map menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        menu.append(&exit_item).map_err(|e| AppError::TrayError {
            reason: format!("Failed to add exit menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let icon = Self::load_icon(VoiceStage::Idle)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(tooltip(VoiceStage::Idle))
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            show_map_item_id: show_map_id,
            exit_item_id: exit_id,
        })
    }

    /// Update the tray icon and tooltip for a new voice stage.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_stage(&mut self, stage: VoiceStage) -> AppResult<()> {
        let icon = Self::load_icon(stage)?;

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(tooltip(stage)))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    #[track_caller]
    fn load_icon(stage: VoiceStage) -> AppResult<Icon> {
        let rgba = icon_pixels(stage);
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Get the show map menu item ID.
    pub fn show_map_item_id(&self) -> &MenuId {
        &self.show_map_item_id
    }

    /// Get the exit menu item ID.
    pub fn exit_item_id(&self) -> &MenuId {
        &self.exit_item_id
    }
}

pub(crate) fn tooltip(stage: VoiceStage) -> &'static str {
    match stage {
        VoiceStage::Idle => "Hospital Navigator - Ready",
        VoiceStage::Recording => "Hospital Navigator - Listening...",
        VoiceStage::Processing => "Hospital Navigator - Finding route...",
    }
}

/// Filled disc in the stage colour on a transparent square.
pub(crate) fn icon_pixels(stage: VoiceStage) -> RgbaImage {
    let color = match stage {
        VoiceStage::Idle => Rgba([0, 115, 230, 255]),
        VoiceStage::Recording => Rgba([220, 40, 40, 255]),
        VoiceStage::Processing => Rgba([240, 170, 0, 255]),
    };

    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = ICON_SIZE as f32 / 2.0 - 1.0;

    RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        if dx * dx + dy * dy <= radius * radius {
            color
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
