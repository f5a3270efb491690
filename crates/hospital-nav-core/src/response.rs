use crate::{BinaryImage, CoreResult, NavError, RequestFailure, RoomIdentifier, RoomInfo};

use serde::Deserialize;

/// A structured path as returned by the path service.
///
/// Only `path` is required; the other fields come from richer backends.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PathRoute {
    /// Room identifiers in travel order.
    pub path: Vec<RoomIdentifier>,
    /// Per-node room records, when the backend provides them.
    #[serde(default)]
    pub formatted_path: Vec<RoomInfo>,
    /// Hop count between start and end.
    #[serde(default)]
    pub distance: Option<u32>,
    #[serde(default)]
    /// Room number of the first node.
    pub start_room: Option<String>,
    #[serde(default)]
    /// Room number of the last node.
    pub end_room: Option<String>,
}

/// Successful answer from the path or voice endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum PathResponse {
    /// Ordered room list.
    Route(PathRoute),
    /// Rendered path overlay.
    Image(BinaryImage),
    /// Link to a rendered overlay that still has to be fetched.
    ImageLink(String),
}

/// JSON body shapes the backend may send.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PathBody {
    Failure { error: String },
    Route(PathRoute),
    ImageLink { path_image: String },
}

/// `{"error": ..}` body carried by non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

impl PathResponse {
    /// Decode a JSON body from the path or voice endpoint.
    ///
    /// A body with an `error` field becomes [`RequestFailure::Backend`].
    #[track_caller]
    pub fn from_json(body: &[u8]) -> CoreResult<Self> {
        let parsed: PathBody = serde_json::from_slice(body).map_err(|e| {
            NavError::request(RequestFailure::Malformed {
                detail: e.to_string(),
            })
        })?;

        match parsed {
            PathBody::Failure { error } => {
                Err(NavError::request(RequestFailure::Backend { message: error }))
            }
            PathBody::Route(route) => Ok(PathResponse::Route(route)),
            PathBody::ImageLink { path_image } => Ok(PathResponse::ImageLink(path_image)),
        }
    }
}
