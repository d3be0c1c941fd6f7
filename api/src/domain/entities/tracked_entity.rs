//! Tracked entity domain model
//!
//! A code repository or package whose popularity is monitored. Rows are
//! created by the discovery process; this service only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque key of a tracked entity (`owner/repo`, `name` or `@scope/name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scoped npm package (`@scope/name`)
    pub fn is_scoped_package(&self) -> bool {
        self.0.starts_with('@')
    }

    /// `owner/repo` pair when the id addresses a repository
    pub fn repo_slug(&self) -> Option<(&str, &str)> {
        if self.is_scoped_package() {
            return None;
        }
        let (owner, repo) = self.0.split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some((owner, repo))
    }

    /// Package name when the id addresses an npm package
    pub fn package_name(&self) -> Option<&str> {
        if self.is_scoped_package() {
            let (scope, name) = self.0.split_once('/')?;
            if scope.len() > 1 && !name.is_empty() && !name.contains('/') {
                return Some(&self.0);
            }
            return None;
        }
        if self.0.is_empty() || self.0.contains('/') {
            None
        } else {
            Some(&self.0)
        }
    }

    /// Path segments of the id; a scope keeps its `@`
    pub fn segments(&self) -> Vec<&str> {
        if !self.0.contains('/') {
            return Vec::new();
        }
        self.0.split('/').filter(|s| !s.is_empty()).collect()
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository or package being ranked
#[derive(Debug, Clone, Serialize)]
pub struct TrackedEntity {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
