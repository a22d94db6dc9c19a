//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::oneshot;

use crate::domain::entities::{FeedRow, UserId};
use crate::domain::ports::{DataSource, FeedQuery, IdentityProvider};
use crate::error::DataSourceError;

type Graph = Arc<RwLock<HashMap<UserId, HashSet<UserId>>>>;

fn lookup(graph: &Graph, actor: &UserId) -> HashSet<UserId> {
    graph.read().unwrap().get(actor).cloned().unwrap_or_default()
}

// ============================================================================
// In-Memory Data Source
// ============================================================================

/// Answers queries from a fixed row set, honouring filters, cursor and limit
#[derive(Default)]
pub struct InMemoryDataSource {
    rows: Arc<RwLock<Vec<FeedRow>>>,
    follows: Graph,
    blocks: Graph,
    failing: AtomicBool,
    queries: AtomicUsize,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, rows: Vec<FeedRow>) -> Self {
        self.rows.write().unwrap().extend(rows);
        self
    }

    pub fn with_follows(self, actor: UserId, authors: impl IntoIterator<Item = UserId>) -> Self {
        self.follows
            .write()
            .unwrap()
            .entry(actor)
            .or_default()
            .extend(authors);
        self
    }

    pub fn with_blocks(self, actor: UserId, authors: impl IntoIterator<Item = UserId>) -> Self {
        self.block(actor, authors);
        self
    }

    /// Add blocks after construction, as if the actor just blocked someone
    pub fn block(&self, actor: UserId, authors: impl IntoIterator<Item = UserId>) {
        self.blocks
            .write()
            .unwrap()
            .entry(actor)
            .or_default()
            .extend(authors);
    }

    /// Make post queries fail with a backend error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of post queries received
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for InMemoryDataSource {
    async fn query_feed(&self, query: &FeedQuery) -> Result<Vec<FeedRow>, DataSourceError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DataSourceError::Backend("simulated outage".to_string()));
        }

        let rows = self.rows.read().unwrap();
        let mut matching: Vec<FeedRow> = rows
            .iter()
            .filter(|row| match &query.author_filter {
                Some(authors) => row
                    .author_id
                    .is_some_and(|author| authors.contains(&UserId(author))),
                None => true,
            })
            .filter(|row| match &query.before {
                Some(cursor) => row
                    .cursor()
                    .is_some_and(|c| cursor.is_after(c.updated_at, c.id)),
                None => true,
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.cursor().cmp(&a.cursor()));
        matching.truncate(query.limit);
        Ok(matching)
    }

    async fn followed_author_ids(
        &self,
        actor: &UserId,
    ) -> Result<HashSet<UserId>, DataSourceError> {
        Ok(lookup(&self.follows, actor))
    }

    async fn blocked_author_ids(&self, actor: &UserId) -> Result<HashSet<UserId>, DataSourceError> {
        Ok(lookup(&self.blocks, actor))
    }
}

// ============================================================================
// Scripted Data Source
// ============================================================================

pub type QueryResponse = Result<Vec<FeedRow>, DataSourceError>;

/// Post queries wait until the test sends their response
#[derive(Default)]
pub struct ScriptedDataSource {
    responses: Mutex<VecDeque<oneshot::Receiver<QueryResponse>>>,
    follows: Graph,
    blocks: Graph,
    queries: AtomicUsize,
}

impl ScriptedDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_follows(self, actor: UserId, authors: impl IntoIterator<Item = UserId>) -> Self {
        self.follows
            .write()
            .unwrap()
            .entry(actor)
            .or_default()
            .extend(authors);
        self
    }

    /// Queue a response slot for the next post query, in call order
    pub fn expect_query(&self) -> oneshot::Sender<QueryResponse> {
        let (tx, rx) = oneshot::channel();
        self.responses.lock().unwrap().push_back(rx);
        tx
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for ScriptedDataSource {
    async fn query_feed(&self, _query: &FeedQuery) -> Result<Vec<FeedRow>, DataSourceError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let slot = self.responses.lock().unwrap().pop_front();
        match slot {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(DataSourceError::Backend("response dropped".to_string()))),
            None => Err(DataSourceError::Backend("unexpected query".to_string())),
        }
    }

    async fn followed_author_ids(
        &self,
        actor: &UserId,
    ) -> Result<HashSet<UserId>, DataSourceError> {
        Ok(lookup(&self.follows, actor))
    }

    async fn blocked_author_ids(&self, actor: &UserId) -> Result<HashSet<UserId>, DataSourceError> {
        Ok(lookup(&self.blocks, actor))
    }
}

// ============================================================================
// Mock Identity Provider
// ============================================================================

#[derive(Default)]
pub struct MockIdentityProvider {
    actor: RwLock<Option<UserId>>,
}

impl MockIdentityProvider {
    pub fn signed_in(actor: UserId) -> Self {
        Self {
            actor: RwLock::new(Some(actor)),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn sign_out(&self) {
        *self.actor.write().unwrap() = None;
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current_actor(&self) -> Option<UserId> {
        *self.actor.read().unwrap()
    }
}
