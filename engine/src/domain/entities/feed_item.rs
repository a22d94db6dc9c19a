//! Feed item domain entity
//!
//! A `FeedItem` is a read projection of one review post, built fresh on every
//! fetch. Rows arrive from the backend as loosely-typed `FeedRow`s and are
//! validated on the way in.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;
use crate::error::DomainError;

/// Highest star rating a review can carry
pub const MAX_RATING: f32 = 5.0;

/// Unique identifier for a review post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeedItemId(pub Uuid);

impl std::fmt::Display for FeedItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Like and comment counts, computed by the backend at fetch time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u32,
    pub comments: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// A dish called out in a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub price: Option<String>,
}

/// A review post as shown in the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: FeedItemId,
    pub author_id: UserId,
    pub updated_at: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
    /// Posted anonymously; consumers hide the author when set
    pub anonymous: bool,
    pub restaurant_name: Option<String>,
    pub caption: Option<String>,
    pub rating: Option<f32>,
    pub image_urls: Vec<String>,
    pub engagement: Engagement,
    pub tags: Vec<Tag>,
    pub dishes: Vec<Dish>,
}

impl FeedItem {
    /// Position of this item in the total feed order
    pub fn cursor(&self) -> FeedCursor {
        FeedCursor {
            updated_at: self.updated_at,
            id: self.id,
        }
    }
}

/// Keyset position in the `(updated_at desc, id desc)` order.
///
/// A page requested with `before = Some(cursor)` contains only rows strictly
/// older than the cursor in that order, so rows sharing a timestamp across a
/// page boundary are neither repeated nor skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedCursor {
    pub updated_at: DateTime<Utc>,
    pub id: FeedItemId,
}

impl FeedCursor {
    /// True if a row at `(updated_at, id)` sorts after (is older than) this cursor
    pub fn is_after(&self, updated_at: DateTime<Utc>, id: FeedItemId) -> bool {
        (updated_at, id) < (self.updated_at, self.id)
    }
}

impl PartialOrd for FeedCursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FeedCursor {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.updated_at, self.id).cmp(&(other.updated_at, other.id))
    }
}

/// PostgREST-style embedded aggregate, e.g. `likes(count)` → `[{"count": 3}]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountAggregate {
    pub count: i64,
}

/// Raw post row as returned by a data source.
///
/// Every field is optional; `FeedItem::try_from` decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedRow {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub anonymous: Option<bool>,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
    #[serde(default)]
    pub likes: Option<Vec<CountAggregate>>,
    #[serde(default)]
    pub comments: Option<Vec<CountAggregate>>,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
    #[serde(default)]
    pub dishes: Option<Vec<Dish>>,
}

impl FeedRow {
    /// Keyset position of this row, if it carries the fields needed for one
    pub fn cursor(&self) -> Option<FeedCursor> {
        Some(FeedCursor {
            updated_at: self.updated_at?,
            id: FeedItemId(self.id?),
        })
    }
}

fn aggregate_count(aggregate: Option<Vec<CountAggregate>>) -> u32 {
    aggregate
        .and_then(|counts| counts.first().copied())
        .map(|c| u32::try_from(c.count.max(0)).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

impl TryFrom<FeedRow> for FeedItem {
    type Error = DomainError;

    fn try_from(row: FeedRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .ok_or_else(|| DomainError::Validation("feed row is missing id".to_string()))?;
        let author_id = row.author_id.ok_or_else(|| {
            DomainError::Validation(format!("feed row {} is missing author_id", id))
        })?;
        let updated_at = row.updated_at.ok_or_else(|| {
            DomainError::Validation(format!("feed row {} is missing updated_at", id))
        })?;

        if let Some(rating) = row.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                return Err(DomainError::Validation(format!(
                    "feed row {} has rating {} outside 0..={}",
                    id, rating, MAX_RATING
                )));
            }
        }

        Ok(FeedItem {
            id: FeedItemId(id),
            author_id: UserId(author_id),
            updated_at,
            created_at: row.created_at,
            anonymous: row.anonymous.unwrap_or(false),
            restaurant_name: row.restaurant_name,
            caption: row.caption,
            rating: row.rating,
            image_urls: row.image_urls.unwrap_or_default(),
            engagement: Engagement {
                likes: aggregate_count(row.likes),
                comments: aggregate_count(row.comments),
            },
            tags: row.tags.unwrap_or_default(),
            dishes: row.dishes.unwrap_or_default(),
        })
    }
}
