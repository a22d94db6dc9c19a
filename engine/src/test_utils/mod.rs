//! Test utilities
//!
//! Manual in-memory implementations of the ports and row fixtures.
//!
//! `ScriptedDataSource` hands every post query a oneshot channel so tests can
//! resolve overlapping requests in whatever order they need.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
