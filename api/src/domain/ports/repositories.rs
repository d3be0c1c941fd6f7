//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::entities::{
    DailyRanking, EntityId, NewDailyRanking, NewSnapshot, Snapshot, TrackedEntity,
};
use crate::error::DomainError;

/// Read access to tracked entities (owned by discovery)
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Find an entity by its key
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<TrackedEntity>, DomainError>;

    /// Find every entity whose key is in `ids`; unknown keys are skipped
    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<TrackedEntity>, DomainError>;

    /// List all tracked entities ordered by key
    async fn list_all(&self) -> Result<Vec<TrackedEntity>, DomainError>;
}

/// Append-only snapshot storage
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Record one measurement
    async fn insert(&self, snapshot: &NewSnapshot) -> Result<Snapshot, DomainError>;

    /// Snapshots captured in `[start, end)`
    async fn find_captured_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>, DomainError>;
}

/// Daily ranking storage
#[async_trait]
pub trait RankingRepository: Send + Sync {
    /// Insert or replace rows keyed by (entity, date)
    async fn upsert_many(&self, rows: &[NewDailyRanking]) -> Result<(), DomainError>;

    /// All rows for a date
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<DailyRanking>, DomainError>;

    /// Top rows for a date by momentum score
    async fn find_top(&self, date: NaiveDate, limit: u64)
        -> Result<Vec<DailyRanking>, DomainError>;

    /// Most recent date that has rows
    async fn latest_date(&self) -> Result<Option<NaiveDate>, DomainError>;

    /// Rows for one entity from `since` onwards, oldest first
    async fn find_history(
        &self,
        entity_id: &EntityId,
        since: NaiveDate,
    ) -> Result<Vec<DailyRanking>, DomainError>;
}

/// Storage handles built once at startup and passed to every service
#[derive(Clone)]
pub struct Store {
    pub entities: Arc<dyn EntityRepository>,
    pub snapshots: Arc<dyn SnapshotRepository>,
    pub rankings: Arc<dyn RankingRepository>,
}

impl Store {
    pub fn new(
        entities: Arc<dyn EntityRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        rankings: Arc<dyn RankingRepository>,
    ) -> Self {
        Self {
            entities,
            snapshots,
            rankings,
        }
    }
}
