use crate::{CoreResult, NavError};

use std::{fmt, panic::Location};

use error_location::ErrorLocation;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Message shown when either room field is blank.
pub const MISSING_ROOMS_MESSAGE: &str = "Please enter both start and end rooms";

/// User-entered label naming a location node in the backend graph.
///
/// Values built with [`RoomIdentifier::parse`] are trimmed and non-empty.
/// Identifiers deserialized from backend paths are taken as-is. Numeric and
/// coordinate node keys are turned into their display text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomIdentifier(String);

impl<'de> Deserialize<'de> for RoomIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_node_text(deserializer).map(Self)
    }
}

/// Deserialize a graph node key of any JSON shape as display text.
///
/// Strings pass through, numbers print without a trailing `.0`, and
/// arrays such as `[x, y]` join their items with `,`.
pub(crate) fn deserialize_node_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|value| node_text(&value))
}

fn node_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(node_text).collect::<Vec<_>>().join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl RoomIdentifier {
    /// Trim `raw` and reject it if nothing is left.
    #[track_caller]
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NavError::Validation {
                reason: MISSING_ROOMS_MESSAGE.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A start/end pair submitted to the path service.
///
/// Serializes to `{"start": .., "end": ..}`; `level` is only sent when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRequest {
    start: RoomIdentifier,
    end: RoomIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<String>,
}

impl PathRequest {
    /// Validate raw input fields into a request.
    #[track_caller]
    pub fn new(start: &str, end: &str) -> CoreResult<Self> {
        Ok(Self {
            start: RoomIdentifier::parse(start)?,
            end: RoomIdentifier::parse(end)?,
            level: None,
        })
    }

    /// Attach a floor hint. Blank levels are ignored.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        let level = level.into();
        let level = level.trim();
        self.level = (!level.is_empty()).then(|| level.to_string());
        self
    }

    /// Origin room.
    pub fn start(&self) -> &RoomIdentifier {
        &self.start
    }

    /// Destination room.
    pub fn end(&self) -> &RoomIdentifier {
        &self.end
    }

    /// Floor hint, if one was attached.
    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }
}
