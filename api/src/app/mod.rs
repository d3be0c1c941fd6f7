//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod collection_service;
pub mod leaderboard_service;
pub mod momentum;
pub mod retry_policy;
pub mod scoring_config;
pub mod scoring_service;

pub use collection_service::{CollectionService, DEFAULT_CONCURRENCY};
pub use leaderboard_service::{History, Leaderboard, LeaderboardService};
pub use retry_policy::{RetryPolicy, DEFAULT_COOLDOWN};
pub use scoring_service::{ScoringReport, ScoringService};
