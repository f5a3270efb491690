use crate::{AppCommand, AppResult, TerminalView, TrayCommand, prompt::HELP_TEXT};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use hospital_nav_core::{
    CpalMicrophone, HttpPathService, NavError, PathRequestController, PathView, RoomQuery,
    VoiceCommandController,
};
use tao::event_loop::EventLoopProxy;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::{MenuEvent, MenuId};

pub(crate) type PathController = PathRequestController<HttpPathService, TerminalView>;
pub(crate) type VoiceController =
    VoiceCommandController<HttpPathService, CpalMicrophone, TerminalView>;

/// Main application state.
///
/// Runs on the async runtime thread. Tray icon updates go back to the main
/// thread through `tray_proxy` because `TrayIcon` is `!Send`.
pub struct App {
    pub(crate) path: Arc<PathController>,
    /// `None` when no input device could be opened at startup.
    pub(crate) voice: Option<Arc<VoiceController>>,
    pub(crate) service: Arc<HttpPathService>,
    pub(crate) view: Arc<TerminalView>,
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) show_map_menu_id: MenuId,
    pub(crate) exit_menu_id: MenuId,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Hospital Navigator starting");

        self.view
            .show_placeholder(&self.path.settings().placeholder_text);
        self.spawn_map(None);

        // MenuEvent::receiver() is a blocking crossbeam receiver; one
        // blocking task forwards into the async channel until it is dropped.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    if !self.handle_tray_event(event) {
                        break;
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd) {
                        info!("Shutdown requested");
                        break;
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        let _ = self.shutdown_tx.send(true);
        let _ = self.tray_proxy.send_event(TrayCommand::Shutdown);
        info!("Hospital Navigator shut down successfully");

        Ok(())
    }

    /// Dispatch one command. Returns `false` when the app should stop.
    ///
    /// Network-bound work is spawned so a slow backend never blocks the
    /// next command, including a voice toggle.
    #[instrument(skip(self))]
    fn handle_command(&self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::SubmitPath { start, end } => {
                let path = Arc::clone(&self.path);
                tokio::spawn(async move {
                    if let Err(e) = path.submit_path(&start, &end).await {
                        debug!(error = %e, "Path submission ended with error");
                    }
                });
            }
            AppCommand::ToggleVoice => self.spawn_voice(false),
            AppCommand::StopVoice => self.spawn_voice(true),
            AppCommand::ShowMap { level } => self.spawn_map(level),
            AppCommand::Help => println!("{}", HELP_TEXT),
            AppCommand::Shutdown => return false,
            catalog => self.spawn_catalog(catalog),
        }

        true
    }

    fn spawn_voice(&self, stop_only: bool) {
        let Some(voice) = &self.voice else {
            let e = NavError::NoMicrophoneFound {
                location: ErrorLocation::from(Location::caller()),
            };
            self.view.show_status(&e.user_message());
            return;
        };

        let voice = Arc::clone(voice);
        tokio::spawn(async move {
            let result = if stop_only {
                voice.stop().await
            } else {
                voice.toggle().await
            };
            match result {
                Ok(stage) => debug!(stage = ?stage, "Voice step complete"),
                Err(e) => debug!(error = %e, "Voice step ended with error"),
            }
        });
    }

    fn spawn_map(&self, level: Option<String>) {
        let path = Arc::clone(&self.path);
        tokio::spawn(async move {
            let result = match level {
                Some(level) => path.load_level_map(&level).await,
                None => path.load_graph_image().await,
            };
            if let Err(e) = result {
                debug!(error = %e, "Map load ended with error");
            }
        });
    }

    fn spawn_catalog(&self, cmd: AppCommand) {
        let service = Arc::clone(&self.service);
        let view = Arc::clone(&self.view);
        tokio::spawn(async move {
            if let Err(e) = run_catalog(&service, &view, cmd).await {
                warn!(error = %e, "Catalog request failed");
                view.show_status(&e.user_message());
            }
        });
    }

    /// Handle tray menu events. Returns `false` on Exit.
    #[instrument(skip(self))]
    fn handle_tray_event(&self, event: MenuEvent) -> bool {
        let event_id = &event.id;

        if *event_id == self.show_map_menu_id {
            info!("Show map requested from tray menu");
            self.spawn_map(None);
        } else if *event_id == self.exit_menu_id {
            info!("Exit requested from tray menu");
            return false;
        }

        true
    }
}

async fn run_catalog(
    service: &HttpPathService,
    view: &TerminalView,
    cmd: AppCommand,
) -> Result<(), NavError> {
    match cmd {
        AppCommand::ListRooms { level: None } => view.show_rooms(&service.rooms().await?),
        AppCommand::ListRooms { level: Some(level) } => {
            view.show_rooms(&service.rooms_on_level(&level).await?)
        }
        AppCommand::ListRoomTypes => view.show_room_types(&service.room_types().await?),
        AppCommand::RoomsOfType { room_type } => {
            view.show_rooms(&service.rooms_of_type(&room_type).await?)
        }
        AppCommand::Search { query } => {
            view.show_rooms(&service.search_rooms(&RoomQuery::text(query)).await?)
        }
        AppCommand::ListFloors => view.show_floors(&service.floors().await?),
        AppCommand::Health => view.show_health(&service.health().await?),
        other => debug!(command = ?other, "Not a catalog command"),
    }

    Ok(())
}
