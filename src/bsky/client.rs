use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::models::{AuthorFeedResponse, Profile, RawPost, XrpcError};
use crate::actor::ActorRef;
use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::error::{status_kind, ReportError};

const GET_PROFILE: &str = "app.bsky.actor.getProfile";
const GET_AUTHOR_FEED: &str = "app.bsky.feed.getAuthorFeed";

/// One page of an author feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPage {
    pub posts: Vec<RawPost>,
    pub cursor: Option<String>,
}

/// Read-only view of the remote feed API.
///
/// The pipeline only talks to the network through this trait, so tests can
/// substitute a stub and adapters decide how the transport is built.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Resolve a handle or DID to the account's profile.
    async fn get_profile(&self, actor: &ActorRef) -> Result<Profile, ReportError>;

    /// Fetch one page of the actor's posts, newest first.
    async fn get_author_feed(
        &self,
        actor: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<FeedPage, ReportError>;
}

/// Bluesky AppView client over a shared `reqwest` connection pool.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct BlueskyClient {
    http: reqwest::Client,
    api_base: String,
}

impl BlueskyClient {
    /// Build a client with the configured base URL and per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .connect_timeout(config.http_timeout)
            .build()?;
        Ok(Self::with_client(http, &config.api_base))
    }

    /// Wrap an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, api_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, ReportError> {
        let url = format!("{}/{endpoint}", self.api_base);

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ReportError::from_reqwest(endpoint, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Fetch {
                endpoint,
                kind: status_kind(status.as_u16()),
                message: upstream_message(status, &body),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ReportError::from_reqwest(endpoint, &e))?;

        serde_json::from_slice(&body).map_err(|e| ReportError::MalformedResponse {
            endpoint,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl FeedSource for BlueskyClient {
    async fn get_profile(&self, actor: &ActorRef) -> Result<Profile, ReportError> {
        debug!(actor = %actor, "Resolving profile");
        self.get_json(GET_PROFILE, &[("actor", actor.as_str())])
            .await
    }

    async fn get_author_feed(
        &self,
        actor: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<FeedPage, ReportError> {
        let limit = limit.to_string();
        let mut query = vec![("actor", actor), ("limit", limit.as_str())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        let response: AuthorFeedResponse = self.get_json(GET_AUTHOR_FEED, &query).await?;

        Ok(FeedPage {
            posts: response.feed.into_iter().map(RawPost::from).collect(),
            cursor: response.cursor.filter(|c| !c.is_empty()),
        })
    }
}

/// Best human-readable explanation for a failed call.
fn upstream_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<XrpcError>(body) {
        Ok(XrpcError {
            message: Some(message),
            ..
        }) => message,
        Ok(XrpcError {
            error: Some(error), ..
        }) => error,
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
