//! Scoring handler

use axum::{body::Bytes, extract::State, Json};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::app::ScoringReport;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ScoreRequest {
    /// Day to score; today (UTC) when omitted
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// POST /score
pub async fn post_score(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ScoringReport>, AppError> {
    let request: ScoreRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ScoreRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?
    };

    let report = match request.date {
        Some(date) => state.scoring_service.score_date(date).await?,
        None => state.scoring_service.score_today().await?,
    };
    Ok(Json(report))
}
