//! Domain ports (traits)
//!
//! Port traits define interfaces that the feed engine requires.
//! Adapters provide concrete implementations of these traits.

pub mod data_source;
pub mod identity;

pub use data_source::{DataSource, FeedQuery};
pub use identity::IdentityProvider;
