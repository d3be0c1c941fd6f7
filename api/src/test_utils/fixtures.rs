//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::domain::entities::{EntityId, Metrics, Snapshot, SnapshotId, TrackedEntity};
use crate::domain::ports::Store;

use super::mocks::{InMemoryEntityRepository, InMemoryRankingRepository, InMemorySnapshotRepository};

/// Create a tracked entity whose display name is its id
pub fn test_entity(id: &str) -> TrackedEntity {
    test_entity_named(id, id)
}

/// Create a tracked entity with a specific display name
pub fn test_entity_named(id: &str, name: &str) -> TrackedEntity {
    let now = Utc::now();
    TrackedEntity {
        id: EntityId::new(id),
        name: name.to_string(),
        description: None,
        created_at: now,
        updated_at: now,
    }
}

/// Calendar date shorthand
pub fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap()
}

/// UTC instant shorthand
pub fn at(year: i32, month: u32, date: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, date, hour, 0, 0).unwrap()
}

/// A stored snapshot captured at `captured_at`
pub fn test_snapshot(id: &str, metrics: Metrics, captured_at: DateTime<Utc>) -> Snapshot {
    Snapshot {
        id: SnapshotId::new(),
        entity_id: EntityId::new(id),
        metrics,
        captured_at,
    }
}

pub fn github(stars: i64, forks: i64) -> Metrics {
    Metrics::GitHub { stars, forks }
}

pub fn npm(downloads: i64) -> Metrics {
    Metrics::Npm { downloads }
}

pub fn reddit(mentions: i64) -> Metrics {
    Metrics::Reddit { mentions }
}

/// In-memory repositories bundled as a `Store`, with handles kept for assertions
pub struct TestStore {
    pub entities: Arc<InMemoryEntityRepository>,
    pub snapshots: Arc<InMemorySnapshotRepository>,
    pub rankings: Arc<InMemoryRankingRepository>,
}

impl TestStore {
    pub fn new(entities: InMemoryEntityRepository) -> Self {
        Self {
            entities: Arc::new(entities),
            snapshots: Arc::new(InMemorySnapshotRepository::new()),
            rankings: Arc::new(InMemoryRankingRepository::new()),
        }
    }

    pub fn store(&self) -> Store {
        Store::new(
            self.entities.clone(),
            self.snapshots.clone(),
            self.rankings.clone(),
        )
    }
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
