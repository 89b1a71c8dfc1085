//! API routes and handlers.

mod board;
mod follows;
mod profiles;
mod sends;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    routing::{get, post, put},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::record::{normalize_at, raw_from_json};
use crate::scope::{Scope, ScopeKind};
use crate::scoring::{attempts_penalty, grade_number, score, status_multiplier};
use crate::store::SendStore;

use super::{error::ApiError, state::AppState};

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let db_routes = Router::new()
        // Sends
        .route("/sends", get(sends::list_sends).post(sends::add_send))
        .route("/sends/{id}", get(sends::get_send).delete(sends::delete_send))
        .route("/sends/{id}/shared", put(sends::set_shared))
        // Aggregates
        .route("/leaderboard", get(board::leaderboard))
        .route("/users/{user}/trend", get(board::trend))
        .route("/users/{user}/last-session", get(board::last_session))
        // Follow graph
        // Profiles
        .route(
            "/users/{user}/profile",
            get(profiles::get_profile).put(profiles::put_profile),
        )
        .route(
            "/users/{user}/following",
            get(follows::list_following).post(follows::follow_by_email),
        )
        .route(
            "/users/{user}/following/{target}",
            put(follows::follow).delete(follows::unfollow),
        );

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/databases", get(list_databases))
        .route("/api/v1/score", post(score_send))
        .nest("/api/v1/db/{database}", db_routes)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List all databases.
async fn list_databases(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .database_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

/// Score breakdown for a single send.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub grade_number: u64,
    pub status_multiplier: u64,
    pub attempts_penalty: u64,
    pub score: u64,
}

/// Score a raw send without storing it.
async fn score_send(body: Bytes) -> Result<Json<ScoreResponse>, ApiError> {
    let text = std::str::from_utf8(&body)
        .map_err(|e| ApiError::invalid_record(format!("Invalid UTF-8: {}", e)))?;
    let raw = raw_from_json(text).map_err(|e| ApiError::invalid_record(e.to_string()))?;

    let record = normalize_at("", &raw, Utc::now());

    Ok(Json(ScoreResponse {
        grade_number: grade_number(&record.grade),
        status_multiplier: status_multiplier(&record.status),
        attempts_penalty: attempts_penalty(&record.attempts),
        score: score(&record),
    }))
}

/// Query parameters selecting a visibility scope.
#[derive(Debug, Deserialize, Default)]
pub struct ScopeQuery {
    /// `world` (default), `friends` or `mine`.
    pub scope: Option<String>,
    /// Viewer id, required by `friends` and `mine`.
    pub user: Option<String>,
}

impl ScopeQuery {
    /// Turn the query into a concrete scope, loading follow edges as needed.
    fn resolve(&self, store: &SendStore) -> Result<Scope, ApiError> {
        let kind = match &self.scope {
            Some(s) => s.parse::<ScopeKind>()?,
            None => ScopeKind::World,
        };
        let viewer = || {
            self.user
                .clone()
                .filter(|u| !u.is_empty())
                .ok_or_else(|| ApiError::missing_user(&kind.to_string()))
        };

        Ok(match kind {
            ScopeKind::World => Scope::World,
            ScopeKind::Friends => store.friends_scope(&viewer()?)?,
            ScopeKind::Mine => Scope::Mine { user_id: viewer()? },
        })
    }
}
