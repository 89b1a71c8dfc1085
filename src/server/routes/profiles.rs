//! Profile handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};

use crate::profile::UserProfile;
use crate::record::raw_from_json;

use super::super::{error::ApiError, state::AppState};

/// A user's saved profile.
pub async fn get_profile(
    State(state): State<AppState>,
    Path((database, user)): Path<(String, String)>,
) -> Result<Json<UserProfile>, ApiError> {
    let store = state.get_database(&database)?;
    let profile = store
        .profile(&user)?
        .ok_or_else(|| ApiError::profile_not_found(&user))?;
    Ok(Json(profile))
}

/// Create or replace a user's profile from a raw JSON object.
pub async fn put_profile(
    State(state): State<AppState>,
    Path((database, user)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<UserProfile>, ApiError> {
    let store = state.get_database(&database)?;

    let text = std::str::from_utf8(&body)
        .map_err(|e| ApiError::invalid_record(format!("Invalid UTF-8: {}", e)))?;
    let raw = raw_from_json(text).map_err(|e| ApiError::invalid_record(e.to_string()))?;

    let profile = UserProfile::from_raw(&user, &raw);
    store.put_profile(&profile)?;
    tracing::debug!(database = %database, user = %user, "profile saved");

    Ok(Json(profile))
}
