//! Source client port
//!
//! One implementation per upstream signal. A client issues the request(s)
//! for a single entity and classifies every failure into a `SourceError`.

use async_trait::async_trait;

use crate::domain::entities::{Metrics, Source, TrackedEntity};
use crate::error::SourceError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Which signal this client produces
    fn source(&self) -> Source;

    /// Fetch the current raw metrics for one entity
    async fn fetch(&self, entity: &TrackedEntity) -> Result<Metrics, SourceError>;
}
