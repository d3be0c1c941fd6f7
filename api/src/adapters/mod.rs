//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;
pub mod sources;

pub use postgres::{PostgresEntityRepository, PostgresRankingRepository, PostgresSnapshotRepository};
pub use sources::{GitHubClient, NpmClient, RedditClient};
