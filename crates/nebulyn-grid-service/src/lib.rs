// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP key-value service for Nebulyn grids.
//!
//! The router is exposed as a library so tests and embedders can mount it
//! without going through the binary. Storage is any [`KeyValueStore`]; when
//! none is configured the service still answers, reporting
//! `Storage not available` for saves and loads and an empty list.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use nebulyn_app_core::remote::{
    remote_key, ErrorBody, GridListing, SaveResponse, StoredGrid, GRID_NOT_FOUND, LIST_PATH,
    LOAD_PATH, REMOTE_KEY_PREFIX, SAVE_PATH, STORAGE_NOT_AVAILABLE,
};
use nebulyn_app_core::{KeyValueStore, StoreError};
use nebulyn_grid::AnySnapshot;
use serde_json::Value;
use time::OffsetDateTime;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

/// Mount point of the grid routes.
pub const API_PREFIX: &str = "/api";

/// Storage handle shared by all requests.
pub type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Request-independent service state.
#[derive(Clone, Default)]
pub struct AppState {
    storage: Option<SharedStore>,
}

impl AppState {
    /// State backed by `store`.
    pub fn with_store(store: impl KeyValueStore + Send + Sync + 'static) -> Self {
        Self {
            storage: Some(Arc::new(store)),
        }
    }

    /// State with no storage configured.
    pub fn unavailable() -> Self {
        Self::default()
    }

    fn storage(&self) -> Result<SharedStore, ApiError> {
        self.storage.clone().ok_or(ApiError::Unavailable)
    }
}

/// Build the service router: grid routes under [`API_PREFIX`], with request
/// tracing.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(SAVE_PATH, post(save_grid))
        .route(&format!("{LOAD_PATH}/{{id}}"), get(load_grid))
        .route(LIST_PATH, get(list_grids));
    Router::new()
        .nest(API_PREFIX, api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler failure, rendered as an [`ErrorBody`].
#[derive(Debug)]
pub enum ApiError {
    /// 400: body is not a grid snapshot.
    BadRequest(String),
    /// 404: unknown grid id.
    NotFound,
    /// 500: no storage configured or backend unreachable.
    Unavailable,
    /// 500: anything else.
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            StoreError::Unavailable(_) => Self::Unavailable,
            StoreError::Validation(msg) => Self::BadRequest(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound => (StatusCode::NOT_FOUND, GRID_NOT_FOUND.to_owned()),
            Self::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                STORAGE_NOT_AVAILABLE.to_owned(),
            ),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody::new(error))).into_response()
    }
}

/// Run blocking storage work off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// `POST /save-grid`: store the posted snapshot under a fresh id. Bodies that
/// are not JSON, or not sent as JSON, get a 400 [`ErrorBody`].
pub async fn save_grid(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let Json(body) = body?;
    let Value::Object(data) = body else {
        return Err(ApiError::BadRequest("grid must be a JSON object".into()));
    };
    let ports = AnySnapshot::from_value(Value::Object(data.clone()))
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
        .port_count();
    let store = state.storage()?;

    let id = Uuid::new_v4().to_string();
    let stored = StoredGrid::new(id.clone(), OffsetDateTime::now_utc(), data);
    let bytes = serde_json::to_vec(&stored).map_err(|e| ApiError::Internal(e.to_string()))?;
    let key = remote_key(&id);
    blocking(move || Ok(store.save_raw(&key, &bytes)?)).await?;

    info!(%id, ports, "grid saved");
    Ok(Json(SaveResponse {
        success: true,
        grid_id: id,
        message: "Grid saved successfully".into(),
    }))
}

/// `GET /load-grid/{id}`: the stored grid, or 404.
pub async fn load_grid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredGrid>, ApiError> {
    let store = state.storage()?;
    let key = remote_key(&id);
    let bytes = blocking(move || Ok(store.load_raw(&key)?)).await?;
    let stored = serde_json::from_slice(&bytes).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(stored))
}

/// `GET /list-grids`: one row per stored grid, oldest first. Empty when no
/// storage is configured.
pub async fn list_grids(State(state): State<AppState>) -> Result<Json<Vec<GridListing>>, ApiError> {
    let Some(store) = state.storage else {
        return Ok(Json(Vec::new()));
    };
    let mut rows = blocking(move || {
        let mut rows = Vec::new();
        for key in store.keys(REMOTE_KEY_PREFIX)? {
            let parsed = store
                .load_raw(&key)
                .map_err(|e| e.to_string())
                .and_then(|b| serde_json::from_slice::<StoredGrid>(&b).map_err(|e| e.to_string()));
            match parsed {
                Ok(stored) => rows.push(stored.listing()),
                Err(err) => warn!(%key, %err, "skipping unreadable grid"),
            }
        }
        Ok(rows)
    })
    .await?;
    rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(Json(rows))
}

/// Process-local store for `--memory` runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        self.lock().insert(key.to_owned(), data.to_vec());
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.lock().remove(key).is_some())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basics() {
        let store = MemoryStore::default();
        store.save_raw("grid:a", b"1").unwrap();
        store.save_raw("other", b"2").unwrap();
        assert_eq!(store.keys("grid:").unwrap(), ["grid:a"]);
        assert!(matches!(store.load_raw("x"), Err(StoreError::NotFound(_))));
        assert!(store.delete_raw("grid:a").unwrap());
        assert!(!store.delete_raw("grid:a").unwrap());
    }

    #[test]
    fn store_errors_map_to_statuses() {
        let status = |e: StoreError| ApiError::from(e).into_response().status();
        assert_eq!(status(StoreError::NotFound("k".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(StoreError::Unavailable("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(StoreError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
    }
}
