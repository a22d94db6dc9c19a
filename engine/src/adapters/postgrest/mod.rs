//! PostgREST adapter
//!
//! Implementation of the `DataSource` port over the hosted backend's REST API.

pub mod client;

pub use client::PostgrestDataSource;
