//! Domain entities
//!
//! Pure domain models for the home timeline.

pub mod feed_item;
pub mod feed_mode;
pub mod user;

pub use feed_item::{
    CountAggregate, Dish, Engagement, FeedCursor, FeedItem, FeedItemId, FeedRow, Tag,
};
pub use feed_mode::FeedMode;
pub use user::UserId;
