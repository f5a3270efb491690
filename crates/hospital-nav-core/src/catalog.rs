//! Room catalog records served by the `/api/*` endpoints.

use crate::room::deserialize_node_text;

use serde::{Deserialize, Serialize};

/// One room node with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Graph node key. Coordinate keys such as `[x, y]` become `"x,y"`.
    #[serde(deserialize_with = "deserialize_node_text")]
    pub node_id: String,
    /// Room number, empty when the feature has none.
    #[serde(default)]
    pub room_no: String,
    /// Room type such as `ICU` or `Ward`.
    #[serde(default = "unknown_room_type")]
    pub room_type: String,
    /// Floor the room is on. Per-floor listings omit it; the client fills
    /// it from the requested floor.
    #[serde(default = "default_level")]
    pub level: String,
    /// Centroid x coordinate.
    #[serde(default)]
    pub x: f64,
    /// Centroid y coordinate.
    #[serde(default)]
    pub y: f64,
}

impl RoomInfo {
    /// Short label: room number when known, node id otherwise.
    pub fn label(&self) -> &str {
        if self.room_no.is_empty() {
            &self.node_id
        } else {
            &self.room_no
        }
    }
}

fn unknown_room_type() -> String {
    "Unknown".to_string()
}

fn default_level() -> String {
    "1".to_string()
}

/// Per-floor statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSummary {
    /// Floor label.
    pub level: String,
    /// Number of rooms on the floor.
    pub room_count: usize,
    /// Distinct room types present.
    #[serde(default)]
    pub room_types: Vec<String>,
    /// Room numbers present.
    #[serde(default)]
    pub room_numbers: Vec<String>,
}

/// Backend health report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"healthy"` when the backend considers itself ready.
    pub status: String,
    /// Whether the room graph has been built.
    pub graph_loaded: bool,
    /// Rooms across all floors.
    #[serde(default)]
    pub total_rooms: usize,
    /// Distinct room types.
    #[serde(default)]
    pub room_types_count: usize,
    /// Floors loaded into the graph.
    #[serde(default)]
    pub floors_loaded: Vec<String>,
}

impl HealthStatus {
    /// Reports healthy with the graph loaded.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.graph_loaded
    }
}

/// Filters for room search. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomQuery {
    /// Substring matched against room number, type, and node id.
    pub q: String,
    /// Exact room type filter.
    pub room_type: Option<String>,
    /// Floor filter.
    pub level: Option<String>,
}

impl RoomQuery {
    /// Free-text query with no filters.
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    /// Query-string pairs in the backend's parameter names.
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if !self.q.is_empty() {
            params.push(("q", self.q.clone()));
        }
        if let Some(room_type) = self.room_type.as_ref().filter(|t| !t.is_empty()) {
            params.push(("type", room_type.clone()));
        }
        if let Some(level) = self.level.as_ref().filter(|l| !l.is_empty()) {
            params.push(("level", level.clone()));
        }
        params
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoomsBody {
    pub(crate) rooms: Vec<RoomInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoomTypesBody {
    pub(crate) room_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchBody {
    pub(crate) results: Vec<RoomInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FloorsBody {
    pub(crate) floors: Vec<FloorSummary>,
}
