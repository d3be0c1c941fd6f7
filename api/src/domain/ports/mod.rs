//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod repositories;
pub mod sources;

pub use repositories::{EntityRepository, RankingRepository, SnapshotRepository, Store};
#[cfg(test)]
pub use sources::MockSourceClient;
pub use sources::SourceClient;
