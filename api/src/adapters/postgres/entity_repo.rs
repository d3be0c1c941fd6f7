//! PostgreSQL adapter for EntityRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::entities::{EntityId, TrackedEntity};
use crate::domain::ports::EntityRepository;
use crate::entity::projects;
use crate::error::DomainError;

/// PostgreSQL implementation of EntityRepository
pub struct PostgresEntityRepository {
    db: DatabaseConnection,
}

impl PostgresEntityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntityRepository for PostgresEntityRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<TrackedEntity>, DomainError> {
        let result = projects::Entity::find_by_id(id.0.clone())
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<TrackedEntity>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = projects::Entity::find()
            .filter(projects::Column::ProjectId.is_in(ids.iter().map(|id| id.0.clone())))
            .order_by_asc(projects::Column::ProjectId)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn list_all(&self) -> Result<Vec<TrackedEntity>, DomainError> {
        let results = projects::Entity::find()
            .order_by_asc(projects::Column::ProjectId)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<projects::Model> for TrackedEntity {
    fn from(model: projects::Model) -> Self {
        TrackedEntity {
            id: EntityId(model.project_id),
            name: model.name,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
