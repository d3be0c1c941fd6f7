//! Leaderboard handlers
//!
//! Read-only views over the scored daily rankings.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::app::{History, Leaderboard};
use crate::domain::entities::EntityId;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RankingsQuery {
    pub date: Option<NaiveDate>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub entity: String,
    pub days: Option<u64>,
}

/// GET /rankings
pub async fn get_rankings(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
) -> Result<Json<Leaderboard>, AppError> {
    let board = state
        .leaderboard_service
        .top(query.date, query.limit)
        .await?;
    Ok(Json(board))
}

/// GET /rankings/history
pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<History>, AppError> {
    let entity = query.entity.trim();
    if entity.is_empty() {
        return Err(AppError::BadRequest("entity is required".into()));
    }
    let history = state
        .leaderboard_service
        .history(&EntityId::new(entity), query.days, Utc::now().date_naive())
        .await?;
    Ok(Json(history))
}
