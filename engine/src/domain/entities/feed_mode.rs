//! Feed tabs

use serde::{Deserialize, Serialize};

/// Which stream the home timeline shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// "For you": every author, shuffled on first load
    #[default]
    Global,
    /// "Following": only authors the actor follows, strictly by recency
    Social,
}

impl FeedMode {
    /// Whether the first page of a fresh load is shuffled
    pub fn shuffles_first_page(&self) -> bool {
        matches!(self, FeedMode::Global)
    }

    /// Whether this mode needs a signed-in actor
    pub fn requires_actor(&self) -> bool {
        matches!(self, FeedMode::Social)
    }
}

impl std::fmt::Display for FeedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedMode::Global => write!(f, "global"),
            FeedMode::Social => write!(f, "social"),
        }
    }
}

impl std::str::FromStr for FeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" | "for_you" | "foryou" => Ok(FeedMode::Global),
            "social" | "following" => Ok(FeedMode::Social),
            _ => Err(format!("Unknown feed mode: {}", s)),
        }
    }
}
