//! Leaderboard, trend and session handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::leaderboard::{LeaderboardEntry, rank_with_names};
use crate::record::SendRecord;
use crate::session;
use crate::trend::{TREND_WEEKS, TrendPoint, weekly_trend};

use super::super::{error::ApiError, state::AppState};
use super::ScopeQuery;

/// Query parameters for the trend endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct TrendQuery {
    /// RFC 3339 instant to chart back from. Defaults to now.
    pub as_of: Option<String>,
}

/// A send as shown in a session list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSend {
    #[serde(flatten)]
    pub record: SendRecord,
    pub color_grade: String,
    pub summary: String,
}

impl From<&SendRecord> for SessionSend {
    fn from(record: &SendRecord) -> Self {
        Self {
            color_grade: record.color_grade(),
            summary: record.summary(),
            record: record.clone(),
        }
    }
}

/// Ranked leaderboard for a scope. Profile names override the names
/// carried on sends.
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(database): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let store = state.get_database(&database)?;
    let scope = query.resolve(store)?;
    let records = store.in_scope(&scope)?;

    let board = rank_with_names(&records, &store.display_names()?);
    tracing::debug!(
        database = %database,
        scope = %scope.kind(),
        sends = records.len(),
        users = board.len(),
        "leaderboard computed"
    );

    Ok(Json(board))
}

/// Weekly average-grade series for one climber.
pub async fn trend(
    State(state): State<AppState>,
    Path((database, user)): Path<(String, String)>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<[TrendPoint; TREND_WEEKS]>, ApiError> {
    let store = state.get_database(&database)?;

    let as_of = match query.as_of.as_deref() {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map_err(|_| ApiError::invalid_timestamp(text))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let records = store.for_user(&user)?;
    Ok(Json(weekly_trend(&records, as_of)))
}

/// The sends of a climber's most recent session.
pub async fn last_session(
    State(state): State<AppState>,
    Path((database, user)): Path<(String, String)>,
) -> Result<Json<Vec<SessionSend>>, ApiError> {
    let store = state.get_database(&database)?;
    let records = store.for_user(&user)?;

    let sends = session::last_session(&records)
        .into_iter()
        .map(SessionSend::from)
        .collect();

    Ok(Json(sends))
}
