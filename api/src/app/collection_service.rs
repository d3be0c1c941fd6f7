//! Collection orchestrator
//!
//! Resolves a batch selection to tracked entities, fetches each one through
//! the source client under the retry policy with bounded concurrency, and
//! appends a snapshot per success. Per-entity failures land in the report;
//! only a failure to resolve the selection fails the batch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use futures_util::{stream, StreamExt};

use super::retry_policy::RetryPolicy;
use crate::domain::entities::{
    window, BatchReport, EntityId, EntityOutcome, EntitySelection, NewSnapshot, Source,
    TrackedEntity,
};
use crate::domain::ports::{SourceClient, Store};
use crate::error::{DomainError, ErrorKind};

/// Default number of entities collected at once
pub const DEFAULT_CONCURRENCY: usize = 4;

pub struct CollectionService {
    store: Store,
    clients: HashMap<Source, Arc<dyn SourceClient>>,
    retry: RetryPolicy,
    concurrency: usize,
}

/// A requested entity after lookup
enum Target {
    Tracked(TrackedEntity),
    Unknown(EntityId),
}

impl CollectionService {
    pub fn new(store: Store, retry: RetryPolicy, concurrency: usize) -> Self {
        Self {
            store,
            clients: HashMap::new(),
            retry,
            concurrency: concurrency.max(1),
        }
    }

    /// Register the client for its source, replacing any previous one
    pub fn with_client(mut self, client: Arc<dyn SourceClient>) -> Self {
        self.clients.insert(client.source(), client);
        self
    }

    pub async fn collect(
        &self,
        source: Source,
        selection: EntitySelection,
    ) -> Result<BatchReport, DomainError> {
        let client = self.clients.get(&source).cloned().ok_or_else(|| {
            DomainError::Validation(format!("No client configured for source {}", source))
        })?;

        let targets = self.resolve(source, selection).await?;
        tracing::info!(
            source = %source,
            entities = targets.len(),
            concurrency = self.concurrency,
            "Collection started"
        );

        let results: Vec<EntityOutcome> = stream::iter(targets)
            .map(|target| {
                let client = client.clone();
                async move { self.process(client.as_ref(), &target).await }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = BatchReport::new(source, results);
        tracing::info!(
            source = %source,
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed,
            "Collection finished"
        );
        Ok(report)
    }

    async fn resolve(
        &self,
        source: Source,
        selection: EntitySelection,
    ) -> Result<Vec<Target>, DomainError> {
        match selection {
            EntitySelection::Single(id) => {
                let target = match self.store.entities.find_by_id(&id).await? {
                    Some(entity) => Target::Tracked(entity),
                    None => Target::Unknown(id),
                };
                Ok(vec![target])
            }
            EntitySelection::Items { ids, offset, limit } => {
                let mut seen = HashSet::new();
                let ids: Vec<EntityId> = ids
                    .into_iter()
                    .filter(|id| seen.insert(id.clone()))
                    .collect();
                let ids = window(ids, offset, limit);

                let mut found: HashMap<EntityId, TrackedEntity> = self
                    .store
                    .entities
                    .find_by_ids(&ids)
                    .await?
                    .into_iter()
                    .map(|e| (e.id.clone(), e))
                    .collect();

                Ok(ids
                    .into_iter()
                    .map(|id| match found.remove(&id) {
                        Some(entity) => Target::Tracked(entity),
                        None => Target::Unknown(id),
                    })
                    .collect())
            }
            EntitySelection::All { offset, limit } => {
                let eligible: Vec<TrackedEntity> = self
                    .store
                    .entities
                    .list_all()
                    .await?
                    .into_iter()
                    .filter(|e| source.tracks(&e.id))
                    .collect();
                Ok(window(eligible, offset, limit)
                    .into_iter()
                    .map(Target::Tracked)
                    .collect())
            }
        }
    }

    async fn process(&self, client: &dyn SourceClient, target: &Target) -> EntityOutcome {
        match target {
            Target::Unknown(id) => {
                tracing::debug!(entity = %id, "Entity is not tracked");
                EntityOutcome::failure(
                    id.clone(),
                    ErrorKind::NotFound,
                    format!("{} is not a tracked entity", id),
                    0,
                )
            }
            Target::Tracked(entity) => self.collect_one(client, entity).await,
        }
    }

    async fn collect_one(
        &self,
        client: &dyn SourceClient,
        entity: &TrackedEntity,
    ) -> EntityOutcome {
        let attempt = self.retry.run(|| client.fetch(entity)).await;

        let metrics = match attempt.result {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!(
                    entity = %entity.id,
                    source = %client.source(),
                    kind = %e.kind(),
                    retries = attempt.retries,
                    error = %e,
                    "Collection failed"
                );
                return EntityOutcome::from_source_error(entity.id.clone(), &e, attempt.retries);
            }
        };

        let snapshot = NewSnapshot {
            entity_id: entity.id.clone(),
            metrics,
            captured_at: Utc::now(),
        };
        match self.store.snapshots.insert(&snapshot).await {
            Ok(stored) => {
                tracing::debug!(entity = %entity.id, snapshot = %stored.id, "Snapshot recorded");
                EntityOutcome::success(entity.id.clone(), metrics, attempt.retries)
            }
            Err(e) => {
                tracing::error!(entity = %entity.id, error = %e, "Failed to store snapshot");
                EntityOutcome::failure(
                    entity.id.clone(),
                    ErrorKind::StorageError,
                    e.to_string(),
                    attempt.retries,
                )
            }
        }
    }
}
