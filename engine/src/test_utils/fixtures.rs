//! Test fixtures
//!
//! Factory functions for feed rows with sensible defaults.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::{CountAggregate, Dish, FeedRow, Tag, UserId};

/// A complete, valid row by `author` last touched at `updated_at`
pub fn test_row(author: UserId, updated_at: DateTime<Utc>) -> FeedRow {
    FeedRow {
        id: Some(Uuid::new_v4()),
        author_id: Some(author.0),
        updated_at: Some(updated_at),
        created_at: Some(updated_at - Duration::minutes(5)),
        anonymous: Some(false),
        restaurant_name: Some("Test Noodle Bar".to_string()),
        caption: Some("Broth was excellent.".to_string()),
        rating: Some(4.0),
        image_urls: Some(vec!["https://images.test/bowl.jpg".to_string()]),
        likes: Some(vec![CountAggregate { count: 3 }]),
        comments: Some(vec![CountAggregate { count: 1 }]),
        tags: Some(vec![Tag {
            name: "noodles".to_string(),
        }]),
        dishes: Some(vec![Dish {
            name: "shoyu ramen".to_string(),
            rating: Some(4.5),
            price: Some("$14".to_string()),
        }]),
    }
}

/// `count` rows by `author`, one minute apart, newest first
pub fn rows_descending(count: usize, author: UserId, newest: DateTime<Utc>) -> Vec<FeedRow> {
    (0..count)
        .map(|i| test_row(author, newest - Duration::minutes(i as i64)))
        .collect()
}
