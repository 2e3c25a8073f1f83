// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Grid service handlers, called directly with extracted arguments.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use nebulyn_app_core::remote::ErrorBody;
use nebulyn_app_core::KeyValueStore;
use nebulyn_dry_tests::{InMemoryStore, SnapshotBuilder};
use nebulyn_grid::Direction;
use nebulyn_grid_service::{list_grids, load_grid, save_grid, ApiError, AppState};
use serde_json::{json, Value};

fn snapshot_json() -> Value {
    let snap = SnapshotBuilder::new()
        .name("Nebulyn Main Grid")
        .port(5, 10, |p| p.color("red").input(Direction::Top))
        .port(8, 12, |p| p.color("blue"))
        .build();
    serde_json::to_value(snap).unwrap()
}

async fn error_of(err: ApiError) -> (StatusCode, ErrorBody) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 16)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn save_then_load_then_list() {
    let store = InMemoryStore::new();
    let state = AppState::with_store(store.clone());

    let Json(saved) = save_grid(State(state.clone()), Ok(Json(snapshot_json())))
        .await
        .unwrap();
    assert!(saved.success);
    assert_eq!(saved.message, "Grid saved successfully");
    assert!(store.contains_key(&format!("grid:{}", saved.grid_id)));

    let Json(stored) = load_grid(State(state.clone()), Path(saved.grid_id.clone()))
        .await
        .unwrap();
    assert_eq!(stored.id, saved.grid_id);
    assert_eq!(stored.created_at, stored.updated_at);
    assert_eq!(stored.data["name"], "Nebulyn Main Grid");
    assert_eq!(stored.snapshot().unwrap().port_count(), 2);

    let Json(rows) = list_grids(State(state)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, saved.grid_id);
    assert_eq!(rows[0].port_count, 2);
}

#[tokio::test]
async fn each_save_gets_a_fresh_id() {
    let state = AppState::with_store(InMemoryStore::new());
    let Json(a) = save_grid(State(state.clone()), Ok(Json(snapshot_json())))
        .await
        .unwrap();
    let Json(b) = save_grid(State(state.clone()), Ok(Json(snapshot_json())))
        .await
        .unwrap();
    assert_ne!(a.grid_id, b.grid_id);
    let Json(rows) = list_grids(State(state)).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn unknown_id_is_404_with_error_body() {
    let state = AppState::with_store(InMemoryStore::new());
    let err = load_grid(State(state), Path("nope".into()))
        .await
        .unwrap_err();
    let (status, body) = error_of(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.success);
    assert_eq!(body.error, "Grid not found");
}

#[tokio::test]
async fn missing_storage_is_reported_and_list_is_empty() {
    let state = AppState::unavailable();
    let err = save_grid(State(state.clone()), Ok(Json(snapshot_json())))
        .await
        .unwrap_err();
    let (status, body) = error_of(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "Storage not available");

    let err = load_grid(State(state.clone()), Path("x".into()))
        .await
        .unwrap_err();
    assert_eq!(error_of(err).await.1.error, "Storage not available");

    let Json(rows) = list_grids(State(state)).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn backend_outage_is_reported_as_unavailable() {
    let store = InMemoryStore::new();
    store.set_unavailable(true);
    let err = save_grid(State(AppState::with_store(store)), Ok(Json(snapshot_json())))
        .await
        .unwrap_err();
    let (status, body) = error_of(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error, "Storage not available");
}

#[tokio::test]
async fn invalid_bodies_are_rejected_before_storage() {
    let store = InMemoryStore::new();
    let state = AppState::with_store(store.clone());

    for body in [
        json!([1, 2, 3]),
        json!({"ports": [{"coordinate": "0,0"}]}),
        json!({"version": "9.0.0", "ports": []}),
    ] {
        let err = save_grid(State(state.clone()), Ok(Json(body))).await.unwrap_err();
        assert_eq!(error_of(err).await.0, StatusCode::BAD_REQUEST);
    }
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn unreadable_entries_are_skipped_in_list() {
    let store = InMemoryStore::new();
    store.save_raw("grid:broken", b"not json").unwrap();
    let state = AppState::with_store(store);
    let Json(saved) = save_grid(State(state.clone()), Ok(Json(snapshot_json())))
        .await
        .unwrap();
    let Json(rows) = list_grids(State(state)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, saved.grid_id);
}
