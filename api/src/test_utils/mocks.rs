//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::entities::{
    DailyRanking, EntityId, Metrics, NewDailyRanking, NewSnapshot, Snapshot, SnapshotId, Source,
    TrackedEntity,
};
use crate::domain::ports::{EntityRepository, RankingRepository, SnapshotRepository, SourceClient};
use crate::error::{DomainError, SourceError};

// ============================================================================
// In-Memory Entity Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryEntityRepository {
    entities: Arc<RwLock<BTreeMap<EntityId, TrackedEntity>>>,
    fail_listing: AtomicBool,
}

impl InMemoryEntityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an entity for testing
    pub fn with_entity(self, entity: TrackedEntity) -> Self {
        self.entities
            .write()
            .unwrap()
            .insert(entity.id.clone(), entity);
        self
    }

    /// Make every read fail with a database error
    pub fn failing(self) -> Self {
        self.fail_listing.store(true, Ordering::SeqCst);
        self
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(DomainError::Database("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl EntityRepository for InMemoryEntityRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<TrackedEntity>, DomainError> {
        self.check()?;
        Ok(self.entities.read().unwrap().get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<TrackedEntity>, DomainError> {
        self.check()?;
        let entities = self.entities.read().unwrap();
        Ok(ids.iter().filter_map(|id| entities.get(id).cloned()).collect())
    }

    async fn list_all(&self) -> Result<Vec<TrackedEntity>, DomainError> {
        self.check()?;
        Ok(self.entities.read().unwrap().values().cloned().collect())
    }
}

// ============================================================================
// In-Memory Snapshot Repository
// ============================================================================

#[derive(Default)]
pub struct InMemorySnapshotRepository {
    snapshots: Arc<RwLock<Vec<Snapshot>>>,
    fail_for: RwLock<HashSet<EntityId>>,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a stored snapshot
    pub fn with_snapshot(self, snapshot: Snapshot) -> Self {
        self.snapshots.write().unwrap().push(snapshot);
        self
    }

    /// Reject inserts for one entity
    pub fn fail_inserts_for(self, id: &str) -> Self {
        self.fail_for.write().unwrap().insert(EntityId::new(id));
        self
    }

    /// Everything written so far, in insertion order
    pub fn all(&self) -> Vec<Snapshot> {
        self.snapshots.read().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn insert(&self, snapshot: &NewSnapshot) -> Result<Snapshot, DomainError> {
        if self.fail_for.read().unwrap().contains(&snapshot.entity_id) {
            return Err(DomainError::Database("insert rejected".into()));
        }
        let stored = Snapshot {
            id: SnapshotId::new(),
            entity_id: snapshot.entity_id.clone(),
            metrics: snapshot.metrics,
            captured_at: snapshot.captured_at,
        };
        self.snapshots.write().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_captured_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>, DomainError> {
        Ok(self
            .snapshots
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.captured_at >= start && s.captured_at < end)
            .cloned()
            .collect())
    }
}

// ============================================================================
// In-Memory Ranking Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryRankingRepository {
    rows: Arc<RwLock<BTreeMap<(NaiveDate, EntityId), DailyRanking>>>,
}

impl InMemoryRankingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a scored row
    pub fn with_row(self, row: NewDailyRanking) -> Self {
        self.rows
            .write()
            .unwrap()
            .insert((row.date, row.entity_id.clone()), row.into_ranking(Utc::now()));
        self
    }

    pub fn count(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    pub fn get(&self, date: NaiveDate, id: &str) -> Option<DailyRanking> {
        self.rows
            .read()
            .unwrap()
            .get(&(date, EntityId::new(id)))
            .cloned()
    }
}

#[async_trait]
impl RankingRepository for InMemoryRankingRepository {
    async fn upsert_many(&self, rows: &[NewDailyRanking]) -> Result<(), DomainError> {
        let now = Utc::now();
        let mut stored = self.rows.write().unwrap();
        for row in rows {
            stored.insert(
                (row.date, row.entity_id.clone()),
                row.clone().into_ranking(now),
            );
        }
        Ok(())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<DailyRanking>, DomainError> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }

    async fn find_top(&self, date: NaiveDate, limit: u64) -> Result<Vec<DailyRanking>, DomainError> {
        let mut rows = self.find_by_date(date).await?;
        rows.sort_by(|a, b| {
            b.momentum_score
                .total_cmp(&a.momentum_score)
                .then_with(|| a.entity_id.cmp(&b.entity_id))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn latest_date(&self) -> Result<Option<NaiveDate>, DomainError> {
        Ok(self.rows.read().unwrap().keys().map(|(date, _)| *date).max())
    }

    async fn find_history(
        &self,
        entity_id: &EntityId,
        since: NaiveDate,
    ) -> Result<Vec<DailyRanking>, DomainError> {
        Ok(self
            .rows
            .read()
            .unwrap()
            .values()
            .filter(|r| &r.entity_id == entity_id && r.date >= since)
            .cloned()
            .collect())
    }
}

// ============================================================================
// Stub Source Client
// ============================================================================

/// Source client with a scripted response per entity
///
/// Unscripted entities get `SourceError::NotFound`. Tracks call count and
/// the peak number of concurrent calls.
pub struct StubSourceClient {
    source: Source,
    responses: HashMap<EntityId, Result<Metrics, SourceError>>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubSourceClient {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            responses: HashMap::new(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn respond(mut self, id: &str, response: Result<Metrics, SourceError>) -> Self {
        self.responses.insert(EntityId::new(id), response);
        self
    }

    /// Sleep this long inside every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceClient for StubSourceClient {
    fn source(&self) -> Source {
        self.source
    }

    async fn fetch(&self, entity: &TrackedEntity) -> Result<Metrics, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.responses
            .get(&entity.id)
            .cloned()
            .unwrap_or_else(|| Err(SourceError::NotFound(format!("{} not scripted", entity.id))))
    }
}
