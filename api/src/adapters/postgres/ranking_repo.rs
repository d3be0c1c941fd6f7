//! PostgreSQL adapter for RankingRepository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::domain::entities::{DailyRanking, EntityId, NewDailyRanking};
use crate::domain::ports::RankingRepository;
use crate::entity::daily_rankings;
use crate::error::DomainError;

/// Rows per INSERT statement, keeps bind parameters well under the Postgres limit
const UPSERT_CHUNK: usize = 500;

/// PostgreSQL implementation of RankingRepository
pub struct PostgresRankingRepository {
    db: DatabaseConnection,
}

impl PostgresRankingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RankingRepository for PostgresRankingRepository {
    async fn upsert_many(&self, rows: &[NewDailyRanking]) -> Result<(), DomainError> {
        if rows.is_empty() {
            return Ok(());
        }

        let now = Utc::now().fixed_offset();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        for chunk in rows.chunks(UPSERT_CHUNK) {
            let models = chunk.iter().map(|row| daily_rankings::ActiveModel {
                project_id: Set(row.entity_id.0.clone()),
                date: Set(row.date),
                github_stars: Set(row.github_stars),
                github_forks: Set(row.github_forks),
                npm_downloads: Set(row.npm_downloads),
                reddit_mentions: Set(row.reddit_mentions),
                github_z_score: Set(row.github_z_score),
                npm_z_score: Set(row.npm_z_score),
                reddit_z_score: Set(row.reddit_z_score),
                momentum_score: Set(row.momentum_score),
                prev_score: Set(row.prev_score),
                delta_vs_prev: Set(row.delta_vs_prev),
                updated_at: Set(now),
            });

            daily_rankings::Entity::insert_many(models)
                .on_conflict(
                    OnConflict::columns([
                        daily_rankings::Column::ProjectId,
                        daily_rankings::Column::Date,
                    ])
                    .update_columns([
                        daily_rankings::Column::GithubStars,
                        daily_rankings::Column::GithubForks,
                        daily_rankings::Column::NpmDownloads,
                        daily_rankings::Column::RedditMentions,
                        daily_rankings::Column::GithubZScore,
                        daily_rankings::Column::NpmZScore,
                        daily_rankings::Column::RedditZScore,
                        daily_rankings::Column::MomentumScore,
                        daily_rankings::Column::PrevScore,
                        daily_rankings::Column::DeltaVsPrev,
                        daily_rankings::Column::UpdatedAt,
                    ])
                    .to_owned(),
                )
                .exec(&txn)
                .await
                .map_err(|e| DomainError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<DailyRanking>, DomainError> {
        let results = daily_rankings::Entity::find()
            .filter(daily_rankings::Column::Date.eq(date))
            .order_by_asc(daily_rankings::Column::ProjectId)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_top(
        &self,
        date: NaiveDate,
        limit: u64,
    ) -> Result<Vec<DailyRanking>, DomainError> {
        let results = daily_rankings::Entity::find()
            .filter(daily_rankings::Column::Date.eq(date))
            .order_by_desc(daily_rankings::Column::MomentumScore)
            .order_by_asc(daily_rankings::Column::ProjectId)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn latest_date(&self) -> Result<Option<NaiveDate>, DomainError> {
        daily_rankings::Entity::find()
            .select_only()
            .column(daily_rankings::Column::Date)
            .order_by_desc(daily_rankings::Column::Date)
            .into_tuple::<NaiveDate>()
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn find_history(
        &self,
        entity_id: &EntityId,
        since: NaiveDate,
    ) -> Result<Vec<DailyRanking>, DomainError> {
        let results = daily_rankings::Entity::find()
            .filter(daily_rankings::Column::ProjectId.eq(entity_id.0.clone()))
            .filter(daily_rankings::Column::Date.gte(since))
            .order_by_asc(daily_rankings::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<daily_rankings::Model> for DailyRanking {
    fn from(model: daily_rankings::Model) -> Self {
        DailyRanking {
            entity_id: EntityId(model.project_id),
            date: model.date,
            github_stars: model.github_stars,
            github_forks: model.github_forks,
            npm_downloads: model.npm_downloads,
            reddit_mentions: model.reddit_mentions,
            github_z_score: model.github_z_score,
            npm_z_score: model.npm_z_score,
            reddit_z_score: model.reddit_z_score,
            momentum_score: model.momentum_score,
            prev_score: model.prev_score,
            delta_vs_prev: model.delta_vs_prev,
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
