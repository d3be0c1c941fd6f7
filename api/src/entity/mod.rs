//! SeaORM entity models
//!
//! Table mappings for the PostgreSQL schema in `migrations/`.

pub mod daily_rankings;
pub mod projects;
pub mod snapshots;
