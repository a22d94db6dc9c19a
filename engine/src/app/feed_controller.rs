//! Feed controller
//!
//! Owns the home timeline: which tab is showing, the loaded items, the
//! pagination cursor and the loading flags. Every fetch is tagged with a
//! request epoch; a response is applied only if no newer request started
//! while it was in flight, which makes overlapping loads safe without any
//! network-level cancellation.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Mutex};

use crate::app::page::{append_unique, shape_page, shuffle_with_seed};
use crate::config::FeedConfig;
use crate::domain::entities::{FeedCursor, FeedItem, FeedMode, FeedRow, UserId};
use crate::domain::ports::{DataSource, FeedQuery, IdentityProvider};
use crate::error::{DataSourceError, FeedError};

/// Produces the shuffle seed for each fresh load
pub type SeedSource = Box<dyn Fn() -> u64 + Send + Sync>;

/// Informational states that are not errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedNotice {
    /// The actor follows nobody, so the following tab is empty
    EmptyFollowSet,
}

impl std::fmt::Display for FeedNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedNotice::EmptyFollowSet => write!(f, "You're not following anyone yet"),
        }
    }
}

/// Why a `load_more` call did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoMorePages,
    LoadInFlight,
}

/// Result of a controller operation that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A fresh page replaced the feed
    Loaded { count: usize },
    /// A page was appended; `count` is the number of new items
    Appended { count: usize },
    /// Following tab with nobody followed; the feed is now empty
    EmptyFollowSet,
    /// A newer request started while this one was in flight
    Discarded,
    Ignored(IgnoreReason),
}

/// What the renderer sees
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub mode: FeedMode,
    pub items: Vec<FeedItem>,
    pub has_more: bool,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub notice: Option<FeedNotice>,
    /// Message for the retry affordance after a transient failure
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct FeedState {
    mode: FeedMode,
    items: Vec<FeedItem>,
    cursor: Option<FeedCursor>,
    epoch: u64,
    shuffle_seed: u64,
    has_more: bool,
    is_loading_initial: bool,
    is_loading_more: bool,
    notice: Option<FeedNotice>,
    last_error: Option<String>,
}

impl FeedState {
    fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            mode: self.mode,
            items: self.items.clone(),
            has_more: self.has_more,
            is_loading_initial: self.is_loading_initial,
            is_loading_more: self.is_loading_more,
            notice: self.notice,
            last_error: self.last_error.clone(),
        }
    }
}

/// Backend response for one page, before it is checked against the epoch
enum Fetched {
    Page {
        rows: Vec<FeedRow>,
        blocked: HashSet<UserId>,
    },
    EmptyFollowSet,
}

/// Home timeline engine
pub struct FeedController<DS, IP>
where
    DS: DataSource,
    IP: IdentityProvider,
{
    source: Arc<DS>,
    identity: Arc<IP>,
    config: FeedConfig,
    seeds: SeedSource,
    state: Mutex<FeedState>,
    updates: watch::Sender<FeedSnapshot>,
}

impl<DS, IP> FeedController<DS, IP>
where
    DS: DataSource,
    IP: IdentityProvider,
{
    pub fn new(source: Arc<DS>, identity: Arc<IP>, config: FeedConfig) -> Self {
        let (updates, _) = watch::channel(FeedSnapshot::default());
        Self {
            source,
            identity,
            config,
            seeds: Box::new(rand::random::<u64>),
            state: Mutex::new(FeedState::default()),
            updates,
        }
    }

    /// Replace the shuffle seed generator
    pub fn with_seed_source(mut self, seeds: SeedSource) -> Self {
        self.seeds = seeds;
        self
    }

    /// Current state as last published
    pub fn snapshot(&self) -> FeedSnapshot {
        self.updates.borrow().clone()
    }

    /// Receive a new snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.updates.subscribe()
    }

    /// Fresh load of `mode`: new epoch, new shuffle seed, cursor back to the top.
    ///
    /// The visible feed is only replaced once the page arrives, so a failed
    /// load leaves the previous items on screen.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, mode: FeedMode) -> Result<LoadOutcome, FeedError> {
        let actor = self.identity.current_actor().await;
        if mode.requires_actor() && actor.is_none() {
            tracing::warn!("Rejecting following feed for unauthenticated actor");
            return Err(FeedError::UnauthenticatedForSocialMode);
        }

        let (my_epoch, seed) = {
            let mut state = self.state.lock().await;
            state.epoch += 1;
            state.shuffle_seed = (self.seeds)();
            state.is_loading_initial = true;
            // any page request still in flight belongs to an older epoch now
            state.is_loading_more = false;
            self.publish(&state);
            (state.epoch, state.shuffle_seed)
        };
        tracing::debug!(epoch = my_epoch, "Starting fresh load");

        let fetched = self.fetch(actor, mode, None).await;

        let mut state = self.state.lock().await;
        if state.epoch != my_epoch {
            tracing::debug!(
                epoch = my_epoch,
                current = state.epoch,
                "Discarding stale load"
            );
            return Ok(LoadOutcome::Discarded);
        }
        state.is_loading_initial = false;

        let outcome = match fetched {
            Err(e) => {
                tracing::warn!("Feed load failed: {}", e);
                state.last_error = Some(e.to_string());
                self.publish(&state);
                return Err(FeedError::TransientFetch(e));
            }
            Ok(Fetched::EmptyFollowSet) => {
                state.items.clear();
                state.cursor = None;
                state.has_more = false;
                state.notice = Some(FeedNotice::EmptyFollowSet);
                LoadOutcome::EmptyFollowSet
            }
            Ok(Fetched::Page { rows, blocked }) => {
                let page = shape_page(rows, &blocked);
                let has_more = page.has_more(self.config.page_size);
                let mut items = page.items;
                if mode.shuffles_first_page() {
                    shuffle_with_seed(&mut items, seed);
                }

                state.cursor = page.oldest;
                state.has_more = has_more;
                state.notice = None;
                state.items = items;
                tracing::info!(
                    count = state.items.len(),
                    raw = page.raw_len,
                    blocked = page.dropped_blocked,
                    has_more = state.has_more,
                    "Feed loaded"
                );
                LoadOutcome::Loaded {
                    count: state.items.len(),
                }
            }
        };

        state.mode = mode;
        state.last_error = None;
        self.publish(&state);
        Ok(outcome)
    }

    /// Fetch the page after the cursor and append it.
    ///
    /// Ignored while any load is in flight or once the feed is exhausted.
    #[tracing::instrument(skip(self))]
    pub async fn load_more(&self) -> Result<LoadOutcome, FeedError> {
        let actor = self.identity.current_actor().await;

        let (my_epoch, mode, before) = {
            let mut state = self.state.lock().await;
            if state.is_loading_initial || state.is_loading_more {
                return Ok(LoadOutcome::Ignored(IgnoreReason::LoadInFlight));
            }
            if !state.has_more {
                return Ok(LoadOutcome::Ignored(IgnoreReason::NoMorePages));
            }
            if state.mode.requires_actor() && actor.is_none() {
                return Err(FeedError::UnauthenticatedForSocialMode);
            }

            state.epoch += 1;
            state.is_loading_more = true;
            self.publish(&state);
            (state.epoch, state.mode, state.cursor)
        };
        tracing::debug!(epoch = my_epoch, "Loading next page");

        let fetched = self.fetch(actor, mode, before).await;

        let mut state = self.state.lock().await;
        if state.epoch != my_epoch {
            tracing::debug!(
                epoch = my_epoch,
                current = state.epoch,
                "Discarding stale page"
            );
            return Ok(LoadOutcome::Discarded);
        }
        state.is_loading_more = false;

        let outcome = match fetched {
            Err(e) => {
                tracing::warn!("Loading next page failed: {}", e);
                state.last_error = Some(e.to_string());
                self.publish(&state);
                return Err(FeedError::TransientFetch(e));
            }
            Ok(Fetched::EmptyFollowSet) => {
                state.has_more = false;
                state.notice = Some(FeedNotice::EmptyFollowSet);
                LoadOutcome::EmptyFollowSet
            }
            Ok(Fetched::Page { rows, .. }) if rows.is_empty() => {
                state.has_more = false;
                LoadOutcome::Appended { count: 0 }
            }
            Ok(Fetched::Page { rows, blocked }) => {
                let page = shape_page(rows, &blocked);
                let has_more = page.has_more(self.config.page_size);
                let count = append_unique(&mut state.items, page.items);
                if let Some(oldest) = page.oldest {
                    state.cursor = Some(oldest);
                }
                state.has_more = has_more;
                tracing::info!(
                    appended = count,
                    total = state.items.len(),
                    has_more = state.has_more,
                    "Page appended"
                );
                LoadOutcome::Appended { count }
            }
        };

        state.last_error = None;
        self.publish(&state);
        Ok(outcome)
    }

    /// Change tabs; always a fresh load
    pub async fn switch_mode(&self, mode: FeedMode) -> Result<LoadOutcome, FeedError> {
        self.load(mode).await
    }

    /// Reload the current tab from the top
    pub async fn refresh(&self) -> Result<LoadOutcome, FeedError> {
        let mode = self.state.lock().await.mode;
        self.load(mode).await
    }

    /// Social graph lookups plus the post query for one page
    async fn fetch(
        &self,
        actor: Option<UserId>,
        mode: FeedMode,
        before: Option<FeedCursor>,
    ) -> Result<Fetched, DataSourceError> {
        let mut query = FeedQuery::first_page(mode, self.config.page_size).before(before);

        if mode == FeedMode::Social {
            let followed = match actor {
                Some(actor) => self.source.followed_author_ids(&actor).await?,
                None => HashSet::new(),
            };
            if followed.is_empty() {
                tracing::info!("Actor follows nobody, skipping post query");
                return Ok(Fetched::EmptyFollowSet);
            }
            query = query.with_authors(followed);
        }

        let blocked = match actor {
            Some(actor) => self.source.blocked_author_ids(&actor).await?,
            None => HashSet::new(),
        };

        let rows = self.source.query_feed(&query).await?;
        Ok(Fetched::Page { rows, blocked })
    }

    fn publish(&self, state: &FeedState) {
        self.updates.send_replace(state.snapshot());
    }
}
