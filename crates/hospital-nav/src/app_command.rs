/// Commands sent from the prompt and hotkey handler to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Request a path between two rooms. Raw input; the controller validates.
    SubmitPath {
        /// Start room as typed.
        start: String,
        /// End room as typed.
        end: String,
    },
    /// Advance the voice state machine (start or stop recording).
    ToggleVoice,
    /// Stop an active recording, if any.
    StopVoice,
    /// Show the whole map, or one floor when `level` is set.
    ShowMap {
        /// Floor to show.
        level: Option<String>,
    },
    /// List rooms, optionally on one floor.
    ListRooms {
        /// Floor filter.
        level: Option<String>,
    },
    /// List room types.
    ListRoomTypes,
    /// List rooms of one type.
    RoomsOfType {
        /// Type name, matched case-insensitively by the backend.
        room_type: String,
    },
    /// Free-text room search.
    Search {
        /// Search text.
        query: String,
    },
    /// Per-floor summary.
    ListFloors,
    /// Backend health check.
    Health,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Shutdown,
}
