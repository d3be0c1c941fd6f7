//! Leaderboard reads
//!
//! Top entities for a date joined with their display names, and the
//! momentum history of one entity.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::scoring_config::{
    DEFAULT_HISTORY_DAYS, DEFAULT_TOP_LIMIT, MAX_HISTORY_DAYS, MAX_TOP_LIMIT,
};
use crate::domain::entities::{DailyRanking, EntityId, TrackedEntity};
use crate::domain::ports::Store;
use crate::error::DomainError;

pub struct LeaderboardService {
    store: Store,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub ranking: DailyRanking,
}

#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    /// `None` when nothing has been scored yet
    pub date: Option<NaiveDate>,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub momentum_score: f64,
    pub delta_vs_prev: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct History {
    pub entity_id: EntityId,
    pub days: u64,
    pub points: Vec<HistoryPoint>,
}

impl LeaderboardService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Top rows for `date`, or the most recently scored date
    pub async fn top(
        &self,
        date: Option<NaiveDate>,
        limit: Option<u64>,
    ) -> Result<Leaderboard, DomainError> {
        let limit = limit.unwrap_or(DEFAULT_TOP_LIMIT).clamp(1, MAX_TOP_LIMIT);
        let date = match date {
            Some(date) => Some(date),
            None => self.store.rankings.latest_date().await?,
        };
        let Some(date) = date else {
            return Ok(Leaderboard {
                date: None,
                entries: Vec::new(),
            });
        };

        let rows = self.store.rankings.find_top(date, limit).await?;
        let ids: Vec<EntityId> = rows.iter().map(|r| r.entity_id.clone()).collect();
        let mut names: HashMap<EntityId, TrackedEntity> = self
            .store
            .entities
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(i, ranking)| {
                let entity = names.remove(&ranking.entity_id);
                LeaderboardEntry {
                    rank: i + 1,
                    name: entity
                        .as_ref()
                        .map(|e| e.name.clone())
                        .unwrap_or_else(|| ranking.entity_id.to_string()),
                    description: entity.and_then(|e| e.description),
                    ranking,
                }
            })
            .collect();

        Ok(Leaderboard {
            date: Some(date),
            entries,
        })
    }

    /// Momentum of one entity dated from `today - days` through `today`
    pub async fn history(
        &self,
        entity_id: &EntityId,
        days: Option<u64>,
        today: NaiveDate,
    ) -> Result<History, DomainError> {
        if self.store.entities.find_by_id(entity_id).await?.is_none() {
            return Err(DomainError::NotFound(entity_id.to_string()));
        }

        let days = days.unwrap_or(DEFAULT_HISTORY_DAYS).clamp(1, MAX_HISTORY_DAYS);
        let since = today
            .checked_sub_days(Days::new(days))
            .unwrap_or(NaiveDate::MIN);

        let mut rows = self.store.rankings.find_history(entity_id, since).await?;
        rows.sort_by_key(|r| r.date);

        Ok(History {
            entity_id: entity_id.clone(),
            days,
            points: rows
                .into_iter()
                .filter(|r| r.date <= today)
                .map(|r| HistoryPoint {
                    date: r.date,
                    momentum_score: r.momentum_score,
                    delta_vs_prev: r.delta_vs_prev,
                })
                .collect(),
        })
    }
}
