//! Application layer
//!
//! The feed controller and the pure page-shaping steps it runs on every
//! response.

pub mod feed_controller;
pub mod page;

pub use feed_controller::{
    FeedController, FeedNotice, FeedSnapshot, IgnoreReason, LoadOutcome, SeedSource,
};
