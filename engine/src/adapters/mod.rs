//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod identity;
pub mod postgrest;

pub use identity::StaticIdentityProvider;
pub use postgrest::PostgrestDataSource;
