//! Daily scoring service
//!
//! Loads one day's snapshots, scores them and upserts the ranking rows.
//! Rescoring a date replaces its rows.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::momentum::compute_rankings;
use super::scoring_config::ScoringWeights;
use crate::domain::entities::EntityId;
use crate::domain::ports::Store;
use crate::error::DomainError;

pub struct ScoringService {
    store: Store,
    weights: ScoringWeights,
}

/// Summary of one scoring run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringReport {
    pub date: NaiveDate,
    pub entities_scored: usize,
    pub github: usize,
    pub npm: usize,
    pub reddit: usize,
}

/// `[date 00:00 UTC, next day 00:00 UTC)`
pub fn period_bounds(date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    let next = date
        .succ_opt()
        .ok_or_else(|| DomainError::Validation(format!("No day after {}", date)))?;
    Ok((
        date.and_time(NaiveTime::MIN).and_utc(),
        next.and_time(NaiveTime::MIN).and_utc(),
    ))
}

impl ScoringService {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            weights: ScoringWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Score the given day
    pub async fn score_date(&self, date: NaiveDate) -> Result<ScoringReport, DomainError> {
        let (start, end) = period_bounds(date)?;
        let snapshots = self.store.snapshots.find_captured_between(start, end).await?;

        if snapshots.is_empty() {
            tracing::info!(%date, "No snapshots to score");
            return Ok(ScoringReport {
                date,
                entities_scored: 0,
                github: 0,
                npm: 0,
                reddit: 0,
            });
        }

        let previous: HashMap<EntityId, f64> = match date.pred_opt() {
            Some(prev) => self
                .store
                .rankings
                .find_by_date(prev)
                .await?
                .into_iter()
                .map(|r| (r.entity_id, r.momentum_score))
                .collect(),
            None => HashMap::new(),
        };

        let rows = compute_rankings(date, &snapshots, &previous, &self.weights);
        self.store.rankings.upsert_many(&rows).await?;

        let report = ScoringReport {
            date,
            entities_scored: rows.len(),
            github: rows.iter().filter(|r| r.github_stars.is_some()).count(),
            npm: rows.iter().filter(|r| r.npm_downloads.is_some()).count(),
            reddit: rows.iter().filter(|r| r.reddit_mentions.is_some()).count(),
        };
        tracing::info!(
            %date,
            snapshots = snapshots.len(),
            scored = report.entities_scored,
            github = report.github,
            npm = report.npm,
            reddit = report.reddit,
            "Scoring finished"
        );
        Ok(report)
    }

    /// Score the current UTC day
    pub async fn score_today(&self) -> Result<ScoringReport, DomainError> {
        self.score_date(Utc::now().date_naive()).await
    }
}
