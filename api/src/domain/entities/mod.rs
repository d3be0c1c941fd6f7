//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod collection;
pub mod ranking;
pub mod snapshot;
pub mod tracked_entity;

pub use collection::{window, BatchReport, EntityOutcome, EntitySelection};
pub use ranking::{DailyRanking, NewDailyRanking};
pub use snapshot::{Metrics, NewSnapshot, Snapshot, SnapshotId, Source};
pub use tracked_entity::{EntityId, TrackedEntity};
