//! Domain layer
//!
//! Tracked entities, snapshots and rankings, plus the ports that storage
//! and upstream sources implement.
//! - `entities`: Domain models and batch types
//! - `ports`: Repository and source client traits

pub mod entities;
pub mod ports;
