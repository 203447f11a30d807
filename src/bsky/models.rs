//! Wire types for the Bluesky XRPC endpoints we consume.
//!
//! Top-level fields that the pipeline cannot work without (`feed`, `did`,
//! `handle`) are required and fail decoding when missing. Every field inside
//! a feed item is optional: a missing, null or wrongly typed value decodes
//! as `None` and is defaulted later by the report builder, so one odd post
//! never aborts a whole page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Response from `app.bsky.actor.getProfile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub did: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub followers_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub follows_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub posts_count: Option<u64>,
}

/// Response from `app.bsky.feed.getAuthorFeed`.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthorFeedResponse {
    pub feed: Vec<FeedViewPost>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FeedViewPost {
    #[serde(default, deserialize_with = "lenient")]
    pub post: Option<PostView>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostView {
    #[serde(default, deserialize_with = "lenient")]
    pub uri: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "lenient")]
    pub record: Option<PostRecord>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub repost_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reply_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub quote_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Author {
    #[serde(default, deserialize_with = "lenient")]
    pub handle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

/// Error body returned by XRPC endpoints on non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct XrpcError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One post exactly as the feed delivered it.
///
/// Fields stay optional here; defaults are applied when the post is turned
/// into a report row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPost {
    pub uri: Option<String>,
    pub author_handle: Option<String>,
    pub text: Option<String>,
    pub created_at: Option<String>,
    pub like_count: Option<u64>,
    pub repost_count: Option<u64>,
    pub reply_count: Option<u64>,
    pub quote_count: Option<u64>,
}

impl From<FeedViewPost> for RawPost {
    fn from(item: FeedViewPost) -> Self {
        let post = item.post.unwrap_or_default();
        let record = post.record.unwrap_or_default();
        Self {
            uri: post.uri,
            author_handle: post.author.and_then(|a| a.handle),
            text: record.text,
            created_at: record.created_at,
            like_count: post.like_count,
            repost_count: post.repost_count,
            reply_count: post.reply_count,
            quote_count: post.quote_count,
        }
    }
}

/// Decode an optional field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Accept a counter in any shape and keep it only if it is a non-negative
/// whole number.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
