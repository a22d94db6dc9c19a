//! PostgREST data source implementation
//!
//! Talks to a hosted PostgREST-compatible backend (the `/rest/v1` surface).
//! Engagement counts and nested tags/dishes are embedded by the backend in
//! the same request as the posts.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use urlencoding::encode;
use uuid::Uuid;

use crate::config::{Config, TableNames};
use crate::domain::entities::{FeedCursor, FeedRow, UserId};
use crate::domain::ports::{DataSource, FeedQuery};
use crate::error::DataSourceError;

/// Columns requested for every post, with embedded aggregates
const POST_SELECT: &str =
    "*,likes(count),comments(count),tags(name),dishes(name,rating,price)";

/// `DataSource` backed by PostgREST
pub struct PostgrestDataSource {
    http: Client,
    base_url: String,
    tables: TableNames,
}

impl PostgrestDataSource {
    pub fn new(
        base_url: &str,
        api_key: &str,
        bearer_token: &str,
        timeout: Duration,
        tables: TableNames,
    ) -> Result<Self, DataSourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key)
                .map_err(|_| DataSourceError::Backend("Invalid API key format".to_string()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", bearer_token))
                .map_err(|_| DataSourceError::Backend("Invalid access token format".to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tables,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, DataSourceError> {
        Self::new(
            &config.postgrest_url,
            &config.postgrest_api_key,
            config.bearer_token(),
            config.http_timeout,
            config.tables.clone(),
        )
    }

    fn rest_url(&self, table: &str, query: &str) -> String {
        format!("{}/rest/v1/{}?{}", self.base_url, table, query)
    }

    fn posts_url(&self, query: &FeedQuery) -> String {
        self.rest_url(&self.tables.posts, &posts_query_string(query))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, DataSourceError> {
        tracing::debug!(url = %url, "PostgREST GET");
        let response = self.http.get(url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, DataSourceError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| DataSourceError::Deserialization(e.to_string()))
        } else if status.as_u16() == 401 {
            Err(DataSourceError::Unauthorized)
        } else if status.as_u16() == 429 {
            Err(DataSourceError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(DataSourceError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[derive(Deserialize)]
struct FollowRow {
    followee_id: Uuid,
}

#[derive(Deserialize)]
struct BlockRow {
    blocked_id: Uuid,
}

fn timestamp_literal(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Keyset filter selecting rows strictly older than `cursor`
fn before_filter(cursor: &FeedCursor) -> String {
    let at = timestamp_literal(cursor.updated_at);
    format!(
        "(updated_at.lt.\"{at}\",and(updated_at.eq.\"{at}\",id.lt.{id}))",
        at = at,
        id = cursor.id
    )
}

/// `in.(...)` list with a stable order so identical queries hit identical URLs
fn author_filter(authors: &HashSet<UserId>) -> String {
    let mut ids: Vec<&UserId> = authors.iter().collect();
    ids.sort();
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({})", joined)
}

fn posts_query_string(query: &FeedQuery) -> String {
    let mut params = vec![
        format!("select={}", encode(POST_SELECT)),
        "order=updated_at.desc,id.desc".to_string(),
        format!("limit={}", query.limit),
    ];

    if let Some(authors) = &query.author_filter {
        params.push(format!("author_id={}", encode(&author_filter(authors))));
    }
    if let Some(cursor) = &query.before {
        params.push(format!("or={}", encode(&before_filter(cursor))));
    }

    params.join("&")
}

#[async_trait]
impl DataSource for PostgrestDataSource {
    async fn query_feed(&self, query: &FeedQuery) -> Result<Vec<FeedRow>, DataSourceError> {
        self.get_json(&self.posts_url(query)).await
    }

    async fn followed_author_ids(
        &self,
        actor: &UserId,
    ) -> Result<HashSet<UserId>, DataSourceError> {
        let url = self.rest_url(
            &self.tables.follows,
            &format!("select=followee_id&follower_id=eq.{}", actor),
        );
        let rows: Vec<FollowRow> = self.get_json(&url).await?;
        Ok(rows.into_iter().map(|r| UserId(r.followee_id)).collect())
    }

    async fn blocked_author_ids(&self, actor: &UserId) -> Result<HashSet<UserId>, DataSourceError> {
        let url = self.rest_url(
            &self.tables.blocks,
            &format!("select=blocked_id&blocker_id=eq.{}", actor),
        );
        let rows: Vec<BlockRow> = self.get_json(&url).await?;
        Ok(rows.into_iter().map(|r| UserId(r.blocked_id)).collect())
    }
}
