//! Snapshot domain entity
//!
//! One timestamped raw measurement from one source for one entity.
//! Snapshots are append-only; duplicates within a period are resolved when
//! scoring by keeping the latest capture.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tracked_entity::EntityId;

/// Unique identifier for a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upstream signal a snapshot was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Star and fork counts from the code host
    GitHub,
    /// Trailing 7-day downloads from the package registry
    Npm,
    /// Mention count from forum search
    Reddit,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::GitHub, Source::Npm, Source::Reddit];

    /// Whether this source collects the entity when enumerating every tracked entity
    pub fn tracks(&self, id: &EntityId) -> bool {
        match self {
            Source::GitHub => id.repo_slug().is_some(),
            Source::Npm => id.package_name().is_some(),
            Source::Reddit => true,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::GitHub => write!(f, "github"),
            Source::Npm => write!(f, "npm"),
            Source::Reddit => write!(f, "reddit"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github" => Ok(Source::GitHub),
            "npm" => Ok(Source::Npm),
            "reddit" => Ok(Source::Reddit),
            _ => Err(format!("Unknown source: {}", s)),
        }
    }
}

/// Raw counts returned by a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Metrics {
    GitHub { stars: i64, forks: i64 },
    Npm { downloads: i64 },
    Reddit { mentions: i64 },
}

impl Metrics {
    pub fn source(&self) -> Source {
        match self {
            Metrics::GitHub { .. } => Source::GitHub,
            Metrics::Npm { .. } => Source::Npm,
            Metrics::Reddit { .. } => Source::Reddit,
        }
    }
}

/// A persisted measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub entity_id: EntityId,
    pub metrics: Metrics,
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn source(&self) -> Source {
        self.metrics.source()
    }
}

/// Data needed to record a measurement
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub entity_id: EntityId,
    pub metrics: Metrics,
    pub captured_at: DateTime<Utc>,
}
