//! Follow graph handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::super::{error::ApiError, state::AppState};

/// Users the given user follows, sorted.
pub async fn list_following(
    State(state): State<AppState>,
    Path((database, user)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, ApiError> {
    let store = state.get_database(&database)?;
    let mut following: Vec<String> = store.following(&user)?.into_iter().collect();
    following.sort();
    Ok(Json(following))
}

/// Start following someone.
pub async fn follow(
    State(state): State<AppState>,
    Path((database, user, target)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let store = state.get_database(&database)?;
    store.follow(&user, &target, Utc::now())?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stop following someone.
pub async fn unfollow(
    State(state): State<AppState>,
    Path((database, user, target)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let store = state.get_database(&database)?;
    store.unfollow(&user, &target)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Body for following someone by the email on their profile.
#[derive(Debug, Deserialize)]
pub struct FollowByEmail {
    pub email: String,
}

/// The user id a follow-by-email resolved to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Followed {
    pub user_id: String,
}

/// Follow whoever registered the given email.
pub async fn follow_by_email(
    State(state): State<AppState>,
    Path((database, user)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<Followed>), ApiError> {
    let store = state.get_database(&database)?;

    let body: FollowByEmail = serde_json::from_slice(&body)
        .map_err(|e| ApiError::invalid_record(format!("Invalid follow request: {}", e)))?;

    let user_id = store.follow_by_email(&user, &body.email, Utc::now())?;
    tracing::info!(database = %database, user = %user, target = %user_id, "followed by email");

    Ok((StatusCode::CREATED, Json(Followed { user_id })))
}
