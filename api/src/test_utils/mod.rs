//! Test utilities
//!
//! In-memory port implementations and test fixtures for unit testing.
//!
//! Repositories are hand-written in-memory stores so service and router
//! tests can seed state and inspect what was written. Source clients use
//! either `StubSourceClient` (scripted per entity) or mockall's
//! `MockSourceClient` when call counts matter.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
