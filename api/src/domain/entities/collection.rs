//! Collection batch types
//!
//! `EntitySelection` is the validated form of a batch invocation;
//! `BatchReport` is what a collection run returns.

use serde::Serialize;

use super::snapshot::{Metrics, Source};
use super::tracked_entity::EntityId;
use crate::error::{ErrorKind, SourceError};

/// Which tracked entities a collection run covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitySelection {
    /// Exactly one entity
    Single(EntityId),
    /// An explicit list, optionally windowed
    Items {
        ids: Vec<EntityId>,
        offset: usize,
        limit: Option<usize>,
    },
    /// Every tracked entity the source can address, optionally windowed
    All { offset: usize, limit: Option<usize> },
}

/// Apply an offset/limit window to a list
pub fn window<T>(items: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
    let iter = items.into_iter().skip(offset);
    match limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}

/// Outcome of collecting one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityOutcome {
    pub entity_id: EntityId,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub retries: u32,
}

impl EntityOutcome {
    pub fn success(entity_id: EntityId, metrics: Metrics, retries: u32) -> Self {
        Self {
            entity_id,
            ok: true,
            metrics: Some(metrics),
            error: None,
            message: None,
            retries,
        }
    }

    pub fn failure(
        entity_id: EntityId,
        kind: ErrorKind,
        message: impl Into<String>,
        retries: u32,
    ) -> Self {
        Self {
            entity_id,
            ok: false,
            metrics: None,
            error: Some(kind),
            message: Some(message.into()),
            retries,
        }
    }

    pub fn from_source_error(entity_id: EntityId, error: &SourceError, retries: u32) -> Self {
        Self::failure(entity_id, error.kind(), error.message(), retries)
    }
}

/// Result of one collection run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// The batch ran; individual failures are in `results`
    pub ok: bool,
    pub source: Source,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<EntityOutcome>,
}

impl BatchReport {
    pub fn new(source: Source, results: Vec<EntityOutcome>) -> Self {
        let succeeded = results.iter().filter(|r| r.ok).count();
        Self {
            ok: true,
            source,
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}
