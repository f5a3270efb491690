//! Line-oriented terminal prompt.
//!
//! Reads stdin on the async runtime and forwards parsed commands to the
//! main application over the same channel the hotkey handler uses.

use crate::{AppCommand, AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, watch},
};
use tracing::{debug, info, instrument, warn};

pub const HELP_TEXT: &str = "\
Commands:
  go <start> to <end>   shortest path between two rooms
  voice                 start or stop a voice command (also CTRL+SHIFT+Space)
  stop                  stop an active voice recording
  map [level]           show the whole map or one floor
  rooms [level]         list rooms
  types                 list room types
  type <name>           list rooms of one type
  search <text>         search rooms by number, type, or id
  floors                per-floor summary
  health                backend status
  help                  this list
  quit                  exit";

/// Parse one prompt line. Blank lines yield `None`.
#[track_caller]
pub fn parse_command(line: &str) -> AppResult<Option<AppCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());

    let command = match word.to_ascii_lowercase().as_str() {
        "go" | "path" => {
            let (start, end) = rest.split_once(" to ").unwrap_or((rest, ""));
            AppCommand::SubmitPath {
                start: start.to_string(),
                end: end.to_string(),
            }
        }
        "voice" => AppCommand::ToggleVoice,
        "stop" => AppCommand::StopVoice,
        "map" => AppCommand::ShowMap {
            level: optional(rest),
        },
        "rooms" => AppCommand::ListRooms {
            level: optional(rest),
        },
        "types" => AppCommand::ListRoomTypes,
        "type" if !rest.is_empty() => AppCommand::RoomsOfType {
            room_type: rest.to_string(),
        },
        "search" => AppCommand::Search {
            query: rest.to_string(),
        },
        "floors" => AppCommand::ListFloors,
        "health" => AppCommand::Health,
        "help" | "?" => AppCommand::Help,
        "quit" | "exit" => AppCommand::Shutdown,
        _ => {
            return Err(AppError::UnknownCommand {
                input: line.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    Ok(Some(command))
}

/// Stdin reader feeding the application command channel.
pub struct PromptReader {
    command_tx: mpsc::Sender<AppCommand>,
}

impl PromptReader {
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Read lines until EOF, `quit`, or shutdown.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{}", HELP_TEXT);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Prompt shutting down");
                    break;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Stdin closed, tray menu remains available");
                        break;
                    };

                    match parse_command(&line) {
                        Ok(Some(command)) => {
                            let stop = command == AppCommand::Shutdown;
                            self.send(command).await?;
                            if stop {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!(error = %e, "Unrecognized prompt input");
                            println!("Unknown command: {}\n{}", line.trim(), HELP_TEXT);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to forward prompt command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
