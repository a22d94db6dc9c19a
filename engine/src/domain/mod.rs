//! Domain layer
//!
//! Timeline models and the ports the feed engine talks through.
//! - `entities`: Feed items, cursors, modes and user ids
//! - `ports`: Traits for the remote data source and the identity provider

pub mod entities;
pub mod ports;
