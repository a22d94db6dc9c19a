//! Dishfeed feed engine
//!
//! Retrieval and pagination for the home timeline of a dish review app.
//! Uses hexagonal (ports & adapters) architecture: the `FeedController`
//! only talks to the backend and the session through the `DataSource` and
//! `IdentityProvider` ports.

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;

#[cfg(test)]
mod test_utils;


pub use adapters::{PostgrestDataSource, StaticIdentityProvider};
pub use app::{FeedController, FeedNotice, FeedSnapshot, IgnoreReason, LoadOutcome};
pub use config::{Config, FeedConfig};
pub use domain::entities::{FeedItem, FeedMode, UserId};
pub use error::{DataSourceError, FeedError};
