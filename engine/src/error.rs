//! Unified error types for the feed engine
//!
//! This module defines error types for each layer:
//! - `DomainError`: Validation of rows entering the domain
//! - `DataSourceError`: Remote backend failures raised by adapters
//! - `FeedError`: Errors surfaced by the feed controller to its consumer
//! - `ConfigError`: Environment configuration problems

use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Backend errors raised by `DataSource` adapters
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized - invalid token")]
    Unauthorized,

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors surfaced at the feed controller boundary
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Sign in to see posts from people you follow")]
    UnauthenticatedForSocialMode,

    #[error("Couldn't load the feed: {0}")]
    TransientFetch(#[from] DataSourceError),
}

impl FeedError {
    /// Whether retrying the same operation can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, FeedError::TransientFetch(_))
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}
