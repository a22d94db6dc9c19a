//! Probe run: one fresh load followed by as many pages as requested

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dishfeed_engine::{
    FeedController, FeedItem, FeedMode, LoadOutcome, PostgrestDataSource,
    StaticIdentityProvider,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOptions {
    pub mode: FeedMode,
    /// Pages to load in total, including the first
    pub pages: usize,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            mode: FeedMode::Global,
            pages: 1,
        }
    }
}

impl ProbeOptions {
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();

        if let Some(mode) = args.next() {
            options.mode = mode.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(pages) = args.next() {
            options.pages = pages
                .parse()
                .with_context(|| format!("Invalid page count: {}", pages))?;
            if options.pages == 0 {
                bail!("Page count must be at least 1");
            }
        }
        if let Some(extra) = args.next() {
            bail!("Unexpected argument: {}", extra);
        }

        Ok(options)
    }
}

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub mode: FeedMode,
    pub pages_loaded: usize,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub items: Vec<FeedItem>,
}

pub async fn run(config: &dishfeed_engine::Config, options: &ProbeOptions) -> Result<ProbeReport> {
    let source = Arc::new(
        PostgrestDataSource::from_config(config).context("Failed to build backend client")?,
    );
    let identity = Arc::new(StaticIdentityProvider::new(config.actor_id));
    let feed = FeedController::new(source, identity, config.feed);

    let outcome = feed
        .load(options.mode)
        .await
        .context("Initial load failed")?;
    tracing::info!(?outcome, "First page");

    let mut pages_loaded = 1;
    while pages_loaded < options.pages {
        match feed.load_more().await.context("Loading next page failed")? {
            LoadOutcome::Ignored(reason) => {
                tracing::info!(?reason, "Pagination stopped");
                break;
            }
            outcome => {
                pages_loaded += 1;
                tracing::info!(?outcome, page = pages_loaded, "Next page");
            }
        }
    }

    let snapshot = feed.snapshot();
    Ok(ProbeReport {
        mode: snapshot.mode,
        pages_loaded,
        has_more: snapshot.has_more,
        notice: snapshot.notice.map(|n| n.to_string()),
        items: snapshot.items,
    })
}
