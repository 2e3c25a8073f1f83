// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire types of the remote grid service, shared by server and client.
//!
//! Routes, relative to the service base URL:
//!
//! | Method | Path              | Body / response                          |
//! |--------|-------------------|------------------------------------------|
//! | POST   | `/save-grid`      | snapshot → [`SaveResponse`]              |
//! | GET    | `/load-grid/{id}` | [`StoredGrid`], or 404 [`ErrorBody`]     |
//! | GET    | `/list-grids`     | `[`[`GridListing`]`]`                    |
//!
//! Every failure carries an [`ErrorBody`].

use nebulyn_grid::{AnySnapshot, GridError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Storage key prefix for remote grids: `grid:<uuid>`.
pub const REMOTE_KEY_PREFIX: &str = "grid:";
/// Path of the save route.
pub const SAVE_PATH: &str = "/save-grid";
/// Path prefix of the load route.
pub const LOAD_PATH: &str = "/load-grid";
/// Path of the list route.
pub const LIST_PATH: &str = "/list-grids";
/// Error text for an unknown id.
pub const GRID_NOT_FOUND: &str = "Grid not found";
/// Error text when the service has no storage configured.
pub const STORAGE_NOT_AVAILABLE: &str = "Storage not available";

/// Storage key for `id`.
pub fn remote_key(id: &str) -> String {
    format!("{REMOTE_KEY_PREFIX}{id}")
}

/// Successful save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    /// Always `true`.
    pub success: bool,
    /// Id assigned to the stored grid.
    pub grid_id: String,
    /// Human-readable confirmation.
    pub message: String,
}

/// Failure body for every route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// What went wrong.
    pub error: String,
}

impl ErrorBody {
    /// Failure with `error` text.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// A grid as the service stores and returns it: the posted snapshot fields
/// plus `id`, `createdAt` and `updatedAt`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredGrid {
    /// Assigned id.
    pub id: String,
    /// First save.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Latest save.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Snapshot fields as posted.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl StoredGrid {
    /// Wrap posted snapshot fields. Envelope keys already present in `data`
    /// are replaced by the service's own.
    pub fn new(id: impl Into<String>, now: OffsetDateTime, mut data: Map<String, Value>) -> Self {
        for key in ["id", "createdAt", "updatedAt"] {
            data.remove(key);
        }
        Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            data,
        }
    }

    /// Number of entries in `ports`.
    pub fn port_count(&self) -> usize {
        self.data
            .get("ports")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Decode the snapshot fields.
    pub fn snapshot(&self) -> Result<AnySnapshot, GridError> {
        AnySnapshot::from_value(Value::Object(self.data.clone()))
    }

    /// Row for the list route.
    pub fn listing(&self) -> GridListing {
        GridListing {
            id: self.id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            port_count: self.port_count(),
        }
    }
}

/// One row of the list route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridListing {
    /// Grid id.
    pub id: String,
    /// First save.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Latest save.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Number of port records.
    pub port_count: usize,
}
