//! Data source port
//!
//! The remote, read-only query interface backing the timeline.
//! Implementations are provided by adapters (e.g., PostgREST).

use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::entities::{FeedCursor, FeedMode, FeedRow, UserId};
use crate::error::DataSourceError;

/// Parameters for one page of posts
#[derive(Debug, Clone, PartialEq)]
pub struct FeedQuery {
    pub mode: FeedMode,
    /// Only rows by these authors; `None` means every author
    pub author_filter: Option<HashSet<UserId>>,
    /// Only rows strictly older than this position; `None` means newest first
    pub before: Option<FeedCursor>,
    pub limit: usize,
}

impl FeedQuery {
    pub fn first_page(mode: FeedMode, limit: usize) -> Self {
        Self {
            mode,
            author_filter: None,
            before: None,
            limit,
        }
    }

    pub fn with_authors(mut self, authors: HashSet<UserId>) -> Self {
        self.author_filter = Some(authors);
        self
    }

    pub fn before(mut self, cursor: Option<FeedCursor>) -> Self {
        self.before = cursor;
        self
    }
}

/// Remote query interface for posts and the social graph
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch up to `query.limit` rows ordered by `(updated_at desc, id desc)`
    async fn query_feed(&self, query: &FeedQuery) -> Result<Vec<FeedRow>, DataSourceError>;

    /// Authors the actor follows; an empty set is a valid answer
    async fn followed_author_ids(&self, actor: &UserId)
        -> Result<HashSet<UserId>, DataSourceError>;

    /// Authors the actor has blocked; an empty set is a valid answer
    async fn blocked_author_ids(&self, actor: &UserId) -> Result<HashSet<UserId>, DataSourceError>;
}
