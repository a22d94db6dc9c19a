use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::entities::UserId;
use crate::error::ConfigError;

/// Default number of posts per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default timeout for a single backend request
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Controller-level settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub page_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FeedConfig {
    pub fn new(page_size: usize) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "FEED_PAGE_SIZE",
                value: page_size.to_string(),
            });
        }
        Ok(Self { page_size })
    }
}

/// Table names on the PostgREST backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub posts: String,
    pub follows: String,
    pub blocks: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            posts: "feed_posts".to_string(),
            follows: "follows".to_string(),
            blocks: "blocks".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedConfig,
    pub postgrest_url: String,
    pub postgrest_api_key: String,
    /// User session token; requests fall back to the API key when unset
    pub postgrest_access_token: Option<String>,
    /// Signed-in actor, absent when running unauthenticated
    pub actor_id: Option<UserId>,
    pub http_timeout: Duration,
    pub tables: TableNames,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let page_size = parse_var("FEED_PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE);
        let timeout_secs =
            parse_var("FEED_HTTP_TIMEOUT_SECS")?.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        let defaults = TableNames::default();

        Ok(Self {
            feed: FeedConfig::new(page_size)?,
            postgrest_url: env::var("POSTGREST_URL")
                .map_err(|_| ConfigError::Missing("POSTGREST_URL"))?,
            postgrest_api_key: env::var("POSTGREST_API_KEY")
                .map_err(|_| ConfigError::Missing("POSTGREST_API_KEY"))?,
            postgrest_access_token: env::var("POSTGREST_ACCESS_TOKEN").ok(),
            actor_id: parse_var("FEED_ACTOR_ID")?,
            http_timeout: Duration::from_secs(timeout_secs),
            tables: TableNames {
                posts: env::var("FEED_POSTS_TABLE").unwrap_or(defaults.posts),
                follows: env::var("FEED_FOLLOWS_TABLE").unwrap_or(defaults.follows),
                blocks: env::var("FEED_BLOCKS_TABLE").unwrap_or(defaults.blocks),
            },
        })
    }

    /// Bearer token sent with every backend request
    pub fn bearer_token(&self) -> &str {
        self.postgrest_access_token
            .as_deref()
            .unwrap_or(&self.postgrest_api_key)
    }
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}
