//! PostgreSQL adapter for SnapshotRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{EntityId, Metrics, NewSnapshot, Snapshot, SnapshotId, Source};
use crate::domain::ports::SnapshotRepository;
use crate::entity::snapshots;
use crate::error::DomainError;

/// PostgreSQL implementation of SnapshotRepository
pub struct PostgresSnapshotRepository {
    db: DatabaseConnection,
}

impl PostgresSnapshotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SnapshotRepository for PostgresSnapshotRepository {
    async fn insert(&self, snapshot: &NewSnapshot) -> Result<Snapshot, DomainError> {
        let (stars, forks, downloads, mentions) = match snapshot.metrics {
            Metrics::GitHub { stars, forks } => (Some(stars), Some(forks), None, None),
            Metrics::Npm { downloads } => (None, None, Some(downloads), None),
            Metrics::Reddit { mentions } => (None, None, None, Some(mentions)),
        };

        let model = snapshots::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(snapshot.entity_id.0.clone()),
            src: Set(snapshot.metrics.source().to_string()),
            stars: Set(stars),
            forks: Set(forks),
            downloads: Set(downloads),
            mentions: Set(mentions),
            captured_at: Set(snapshot.captured_at.fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        result.try_into()
    }

    async fn find_captured_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Snapshot>, DomainError> {
        let results = snapshots::Entity::find()
            .filter(snapshots::Column::CapturedAt.gte(start.fixed_offset()))
            .filter(snapshots::Column::CapturedAt.lt(end.fixed_offset()))
            .order_by_asc(snapshots::Column::CapturedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        results.into_iter().map(Snapshot::try_from).collect()
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<snapshots::Model> for Snapshot {
    type Error = DomainError;

    fn try_from(model: snapshots::Model) -> Result<Self, Self::Error> {
        let source: Source = model.src.parse().map_err(DomainError::Database)?;
        let metrics = match source {
            Source::GitHub => Metrics::GitHub {
                stars: model.stars.unwrap_or(0),
                forks: model.forks.unwrap_or(0),
            },
            Source::Npm => Metrics::Npm {
                downloads: model.downloads.unwrap_or(0),
            },
            Source::Reddit => Metrics::Reddit {
                mentions: model.mentions.unwrap_or(0),
            },
        };

        Ok(Snapshot {
            id: SnapshotId(model.id),
            entity_id: EntityId(model.project_id),
            metrics,
            captured_at: model.captured_at.with_timezone(&Utc),
        })
    }
}
