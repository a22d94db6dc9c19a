//! Page shaping
//!
//! Pure helpers that turn a raw backend page into timeline items: ingress
//! validation, block filtering, de-duplication and the seeded first-page
//! shuffle.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::entities::{FeedCursor, FeedItem, FeedItemId, FeedRow, UserId};

/// A raw page after validation, block filtering and de-duplication
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedPage {
    pub items: Vec<FeedItem>,
    /// Rows the backend returned, before anything was dropped
    pub raw_len: usize,
    /// Oldest position in the raw page; the next page starts after it
    pub oldest: Option<FeedCursor>,
    pub dropped_invalid: usize,
    pub dropped_blocked: usize,
}

impl ShapedPage {
    /// Whether another page may follow this one.
    ///
    /// A full page with no usable position cannot move the cursor, so asking
    /// again would return the same rows.
    pub fn has_more(&self, page_size: usize) -> bool {
        self.oldest.is_some() && self.raw_len >= page_size
    }
}

/// Validate, filter and de-duplicate one backend page.
///
/// `raw_len` and `oldest` describe the page as the backend returned it, so a
/// page thinned out by blocked authors still paginates past those rows.
pub fn shape_page(rows: Vec<FeedRow>, blocked: &HashSet<UserId>) -> ShapedPage {
    let raw_len = rows.len();
    let oldest = rows.iter().filter_map(FeedRow::cursor).min();

    let mut dropped_invalid = 0;
    let mut dropped_blocked = 0;
    let mut items = Vec::with_capacity(raw_len);

    for row in rows {
        match FeedItem::try_from(row) {
            Ok(item) if blocked.contains(&item.author_id) => dropped_blocked += 1,
            Ok(item) => items.push(item),
            Err(e) => {
                dropped_invalid += 1;
                tracing::warn!("Dropping malformed feed row: {}", e);
            }
        }
    }

    ShapedPage {
        items: dedup_by_id(items),
        raw_len,
        oldest,
        dropped_invalid,
        dropped_blocked,
    }
}

/// Collapse repeated ids. The last occurrence's data wins, at the position
/// where the id first appeared.
pub fn dedup_by_id(items: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut positions: HashMap<FeedItemId, usize> = HashMap::with_capacity(items.len());
    let mut unique: Vec<FeedItem> = Vec::with_capacity(items.len());

    for item in items {
        match positions.get(&item.id) {
            Some(&index) => unique[index] = item,
            None => {
                positions.insert(item.id, unique.len());
                unique.push(item);
            }
        }
    }

    unique
}

/// Append `incoming` to `existing`, replacing already-loaded ids in place.
/// Returns how many new items were appended.
pub fn append_unique(existing: &mut Vec<FeedItem>, incoming: Vec<FeedItem>) -> usize {
    let mut positions: HashMap<FeedItemId, usize> = existing
        .iter()
        .enumerate()
        .map(|(index, item)| (item.id, index))
        .collect();
    let before = existing.len();

    for item in incoming {
        match positions.get(&item.id) {
            Some(&index) => existing[index] = item,
            None => {
                positions.insert(item.id, existing.len());
                existing.push(item);
            }
        }
    }

    existing.len() - before
}

/// Fisher–Yates permutation driven by a single seed; same seed, same order
pub fn shuffle_with_seed(items: &mut [FeedItem], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
}
