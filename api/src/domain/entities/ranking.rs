//! Daily ranking domain entity
//!
//! One scored row per (entity, date). Rows are upserted, so rescoring a date
//! replaces the previous result.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::tracked_entity::EntityId;

/// A scored leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRanking {
    pub entity_id: EntityId,
    pub date: NaiveDate,
    pub github_stars: Option<i64>,
    pub github_forks: Option<i64>,
    pub npm_downloads: Option<i64>,
    pub reddit_mentions: Option<i64>,
    pub github_z_score: f64,
    pub npm_z_score: f64,
    pub reddit_z_score: f64,
    pub momentum_score: f64,
    pub prev_score: Option<f64>,
    pub delta_vs_prev: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

/// Scoring output for one entity, ready to upsert
#[derive(Debug, Clone, PartialEq)]
pub struct NewDailyRanking {
    pub entity_id: EntityId,
    pub date: NaiveDate,
    pub github_stars: Option<i64>,
    pub github_forks: Option<i64>,
    pub npm_downloads: Option<i64>,
    pub reddit_mentions: Option<i64>,
    pub github_z_score: f64,
    pub npm_z_score: f64,
    pub reddit_z_score: f64,
    pub momentum_score: f64,
    pub prev_score: Option<f64>,
    pub delta_vs_prev: Option<f64>,
}

impl NewDailyRanking {
    pub fn into_ranking(self, updated_at: DateTime<Utc>) -> DailyRanking {
        DailyRanking {
            entity_id: self.entity_id,
            date: self.date,
            github_stars: self.github_stars,
            github_forks: self.github_forks,
            npm_downloads: self.npm_downloads,
            reddit_mentions: self.reddit_mentions,
            github_z_score: self.github_z_score,
            npm_z_score: self.npm_z_score,
            reddit_z_score: self.reddit_z_score,
            momentum_score: self.momentum_score,
            prev_score: self.prev_score,
            delta_vs_prev: self.delta_vs_prev,
            updated_at,
        }
    }
}
