//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod entity_repo;
pub mod ranking_repo;
pub mod snapshot_repo;


pub use entity_repo::PostgresEntityRepository;
pub use ranking_repo::PostgresRankingRepository;
pub use snapshot_repo::PostgresSnapshotRepository;
