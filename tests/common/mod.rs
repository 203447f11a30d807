//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bsky_post_reporter::{
    ActorRef, FeedPage, FeedSource, FetchErrorKind, Profile, RawPost, ReportError,
};
use serde_json::{json, Value};

pub fn profile(handle: &str) -> Profile {
    Profile {
        did: "did:plc:testuser".to_string(),
        handle: handle.to_string(),
        display_name: Some("Test User".to_string()),
        avatar: None,
        followers_count: Some(10),
        follows_count: Some(20),
        posts_count: Some(120),
    }
}

/// Build `count` raw posts whose record keys start at `start`.
pub fn raw_posts(start: usize, count: usize) -> Vec<RawPost> {
    (start..start + count)
        .map(|i| RawPost {
            uri: Some(format!("at://did:plc:testuser/app.bsky.feed.post/p{i}")),
            author_handle: Some("alice.bsky.social".to_string()),
            text: Some(format!("post {i}\nsecond line")),
            created_at: Some("2024-01-01T00:00:00.000Z".to_string()),
            like_count: Some(i as u64),
            repost_count: None,
            reply_count: Some(1),
            quote_count: None,
        })
        .collect()
}

/// In-memory feed that counts every call it receives.
///
/// Page `n` is served for cursor `page-n` (page 0 without a cursor); the
/// last page carries no cursor. Pages are returned whole regardless of the
/// requested limit so callers must trim themselves.
pub struct StubFeed {
    pub profile: Profile,
    /// HTTP status to fail `get_profile` with.
    pub profile_error: Option<u16>,
    pub pages: Vec<Vec<RawPost>>,
    /// Fail the feed call with this (zero-based) index with the given status.
    pub feed_error: Option<(usize, u16)>,
    pub profile_calls: AtomicUsize,
    pub feed_calls: AtomicUsize,
    pub requested_limits: Mutex<Vec<usize>>,
}

impl StubFeed {
    pub fn new(pages: Vec<Vec<RawPost>>) -> Self {
        Self {
            profile: profile("alice.bsky.social"),
            profile_error: None,
            pages,
            feed_error: None,
            profile_calls: AtomicUsize::new(0),
            feed_calls: AtomicUsize::new(0),
            requested_limits: Mutex::new(Vec::new()),
        }
    }

    /// `pages` pages of `per_page` posts each.
    pub fn uniform(pages: usize, per_page: usize) -> Self {
        Self::new(
            (0..pages)
                .map(|p| raw_posts(p * per_page, per_page))
                .collect(),
        )
    }

    pub fn total_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst) + self.feed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for StubFeed {
    async fn get_profile(&self, _actor: &ActorRef) -> Result<Profile, ReportError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        match self.profile_error {
            Some(status) => Err(upstream_error("app.bsky.actor.getProfile", status)),
            None => Ok(self.profile.clone()),
        }
    }

    async fn get_author_feed(
        &self,
        _actor: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<FeedPage, ReportError> {
        let call = self.feed_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_limits.lock().unwrap().push(limit);

        if let Some((failing_call, status)) = self.feed_error {
            if call == failing_call {
                return Err(upstream_error("app.bsky.feed.getAuthorFeed", status));
            }
        }

        let index = cursor
            .and_then(|c| c.strip_prefix("page-"))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        let posts = self.pages.get(index).cloned().unwrap_or_default();
        let cursor = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));

        Ok(FeedPage { posts, cursor })
    }
}

fn upstream_error(endpoint: &'static str, status: u16) -> ReportError {
    let kind = if status == 429 {
        FetchErrorKind::RateLimited
    } else {
        FetchErrorKind::Status(status)
    };
    ReportError::Fetch {
        endpoint,
        kind,
        message: format!("stub failure {status}"),
    }
}

/// JSON body of one `getAuthorFeed` page as the AppView returns it.
pub fn feed_page_json(start: usize, count: usize, cursor: Option<&str>) -> Value {
    let feed: Vec<Value> = (start..start + count)
        .map(|i| {
            json!({
                "post": {
                    "uri": format!("at://did:plc:testuser/app.bsky.feed.post/p{i}"),
                    "cid": format!("bafy{i}"),
                    "author": {"did": "did:plc:testuser", "handle": "alice.bsky.social"},
                    "record": {
                        "$type": "app.bsky.feed.post",
                        "text": format!("post {i}\nsecond line"),
                        "createdAt": "2024-01-01T00:00:00.000Z"
                    },
                    "likeCount": i,
                    "repostCount": 0,
                    "replyCount": 1,
                    "quoteCount": 0,
                    "indexedAt": "2024-01-01T00:00:01.000Z"
                }
            })
        })
        .collect();

    match cursor {
        Some(c) => json!({ "feed": feed, "cursor": c }),
        None => json!({ "feed": feed }),
    }
}

pub fn profile_json(handle: &str) -> Value {
    json!({
        "did": "did:plc:testuser",
        "handle": handle,
        "displayName": "Test User",
        "followersCount": 10,
        "followsCount": 20,
        "postsCount": 120
    })
}
