//! Send handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;

use crate::record::{SendRecord, raw_from_json};

use super::super::{error::ApiError, state::AppState};
use super::ScopeQuery;

/// Body for changing a send's visibility.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedBody {
    pub is_shared: bool,
}

/// List sends visible in a scope, newest first.
pub async fn list_sends(
    State(state): State<AppState>,
    Path(database): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<Vec<SendRecord>>, ApiError> {
    let store = state.get_database(&database)?;
    let scope = query.resolve(store)?;

    let mut records = store.in_scope(&scope)?;
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    Ok(Json(records))
}

/// Add a send from a raw JSON object.
pub async fn add_send(
    State(state): State<AppState>,
    Path(database): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<SendRecord>), ApiError> {
    let store = state.get_database(&database)?;

    let text = std::str::from_utf8(&body)
        .map_err(|e| ApiError::invalid_record(format!("Invalid UTF-8: {}", e)))?;
    let raw = raw_from_json(text).map_err(|e| ApiError::invalid_record(e.to_string()))?;

    let record = store.add(&raw, Utc::now())?;
    tracing::info!(database = %database, id = %record.id, user = %record.user_id, "send added");

    Ok((StatusCode::CREATED, Json(record)))
}

/// Get a single send.
pub async fn get_send(
    State(state): State<AppState>,
    Path((database, id)): Path<(String, String)>,
) -> Result<Json<SendRecord>, ApiError> {
    let store = state.get_database(&database)?;
    let record = store
        .get(&id)?
        .ok_or_else(|| ApiError::send_not_found(&database, &id))?;
    Ok(Json(record))
}

/// Delete a send.
pub async fn delete_send(
    State(state): State<AppState>,
    Path((database, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let store = state.get_database(&database)?;
    store.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Share or unshare a send.
pub async fn set_shared(
    State(state): State<AppState>,
    Path((database, id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<SendRecord>, ApiError> {
    let store = state.get_database(&database)?;

    let body: SharedBody = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_record(format!("Invalid shared flag: {}", e)))?;

    let record = store.set_shared(&id, body.is_shared)?;
    Ok(Json(record))
}
