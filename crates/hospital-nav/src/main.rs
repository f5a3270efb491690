//! Hospital Navigator: desktop client for the hospital navigation service.
//!
//! Terminal prompt for path and catalog queries, a tray icon, and a global
//! hotkey for voice commands.

mod app;
mod app_command;
mod config;
mod error;
mod hotkey_handler;
mod prompt;
mod terminal_view;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    prompt::PromptReader,
    terminal_view::TerminalView,
    tray_command::TrayCommand,
    tray_manager::TrayManager,
};

use crate::config::Config;

use std::sync::Arc;

use global_hotkey::GlobalHotKeyManager;
use hospital_nav_core::{
    CpalMicrophone, HttpPathService, PathRequestController, VoiceCommandController,
};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, warn};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("hospital_nav=debug,hospital_nav_core=debug")
        .init();

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new() {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Dropping the manager unregisters the hotkey.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    TrayCommand::SetStage(stage) => {
                        if let Err(e) = tray_manager.update_stage(stage) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                    TrayCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(tao::event::StartCause::Init) => {
                let config = match Config::load() {
                    Ok(c) => c,
                    Err(e) => {
                        error!("Failed to load config: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let service = match config.endpoints().and_then(|endpoints| {
                    HttpPathService::new(endpoints, config.request_timeout()).map_err(AppError::from)
                }) {
                    Ok(s) => Arc::new(s),
                    Err(e) => {
                        error!("Failed to create backend client: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let image_dir = match Config::image_dir() {
                    Ok(dir) => dir,
                    Err(e) => {
                        error!("Failed to prepare image directory: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let view = Arc::new(
                    TerminalView::new(image_dir, config.behavior.open_images)
                        .with_tray(tray_proxy.clone()),
                );
                let settings = config.controller_settings();

                let voice = match CpalMicrophone::new(config.audio.selected_device.as_deref()) {
                    Ok(microphone) => Some(Arc::new(VoiceCommandController::new(
                        Arc::clone(&service),
                        microphone,
                        Arc::clone(&view),
                        &settings,
                    ))),
                    Err(e) => {
                        warn!(error = ?e, "Voice commands disabled");
                        None
                    }
                };

                let path = Arc::new(PathRequestController::new(
                    Arc::clone(&service),
                    Arc::clone(&view),
                    settings,
                ));

                let (command_tx, command_rx) = mpsc::channel(32);
                let (shutdown_tx, shutdown_rx) = watch::channel(false);

                // Register on the main thread: tao's event loop pumps the
                // messages needed for WM_HOTKEY delivery on Windows.
                let hotkey_id = match HotkeyHandler::register_hotkey() {
                    Ok((manager, id)) => {
                        hotkey_manager = Some(manager);
                        Some(id)
                    }
                    Err(e) => {
                        warn!(error = ?e, "Global hotkey unavailable, use the `voice` command");
                        None
                    }
                };

                let tray_proxy = tray_proxy.clone();
                let show_map_menu_id = tray_manager.show_map_item_id().clone();
                let exit_menu_id = tray_manager.exit_item_id().clone();

                // Tokio runtime on its own thread; TrayManager and the hotkey
                // manager stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let hotkey_handler =
                            hotkey_id.map(|id| HotkeyHandler::new(id, command_tx.clone()));
                        let prompt = PromptReader::new(command_tx);

                        let app = App {
                            path,
                            voice,
                            service,
                            view,
                            tray_proxy,
                            command_rx,
                            shutdown_tx,
                            show_map_menu_id,
                            exit_menu_id,
                        };

                        let hotkey_shutdown = shutdown_rx.clone();

                        tokio::join!(
                            async {
                                if let Some(handler) = hotkey_handler {
                                    if let Err(e) = handler.run(hotkey_shutdown).await {
                                        error!(error = ?e, "Hotkey handler error");
                                    }
                                }
                            },
                            async {
                                if let Err(e) = prompt.run(shutdown_rx).await {
                                    error!(error = ?e, "Prompt error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });

                    // Stdin reads may still be parked on a blocking thread.
                    rt.shutdown_background();
                });
            }
            _ => {}
        }

        // Keep hotkey_manager alive in the closure for the app's lifetime.
        let _ = &hotkey_manager;
    });
}
