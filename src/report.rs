//! Flat report rows and the report that wraps them.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::bsky::{Profile, RawPost};
use crate::constants::{BSKY_WEB_BASE, REPORT_TIME_FORMAT};

/// CSV column order. Matches the field order of [`ReportRow`].
pub const CSV_COLUMNS: [&str; 9] = [
    "handle",
    "post_date",
    "post_url",
    "first_line",
    "likes",
    "reposts",
    "replies",
    "quotes",
    "uri",
];

/// One post, flattened for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub handle: String,
    pub post_date: String,
    pub post_url: String,
    pub first_line: String,
    pub likes: u64,
    pub reposts: u64,
    pub replies: u64,
    pub quotes: u64,
    pub uri: String,
}

impl ReportRow {
    /// Flatten a raw post. `fallback_handle` is used when the post carries no
    /// author handle of its own.
    #[must_use]
    pub fn from_raw(post: &RawPost, fallback_handle: &str) -> Self {
        let handle = post
            .author_handle
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(fallback_handle)
            .to_string();
        let uri = post.uri.clone().unwrap_or_default();

        Self {
            post_url: post_url(&handle, &uri),
            post_date: format_post_date(post.created_at.as_deref()),
            first_line: first_line(post.text.as_deref()).to_string(),
            likes: post.like_count.unwrap_or(0),
            reposts: post.repost_count.unwrap_or(0),
            replies: post.reply_count.unwrap_or(0),
            quotes: post.quote_count.unwrap_or(0),
            handle,
            uri,
        }
    }
}

/// The rows for one account plus report metadata.
///
/// Built once and never mutated; `post_count` always equals the number of
/// rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    did: String,
    handle: String,
    post_count: usize,
    #[serde(with = "report_time")]
    generated_at: DateTime<Utc>,
    posts: Vec<ReportRow>,
}

impl Report {
    #[must_use]
    pub fn did(&self) -> &str {
        &self.did
    }

    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    #[must_use]
    pub fn post_count(&self) -> usize {
        self.post_count
    }

    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    #[must_use]
    pub fn posts(&self) -> &[ReportRow] {
        &self.posts
    }
}

/// Build a report stamped with the current time.
#[must_use]
pub fn build_report(profile: &Profile, posts: &[RawPost]) -> Report {
    build_report_at(profile, posts, Utc::now())
}

/// Build a report with an explicit generation time (truncated to seconds).
#[must_use]
pub fn build_report_at(profile: &Profile, posts: &[RawPost], generated_at: DateTime<Utc>) -> Report {
    let rows: Vec<ReportRow> = posts
        .iter()
        .map(|post| ReportRow::from_raw(post, &profile.handle))
        .collect();

    Report {
        did: profile.did.clone(),
        handle: profile.handle.clone(),
        post_count: rows.len(),
        generated_at: generated_at.trunc_subsecs(0),
        posts: rows,
    }
}

/// Everything before the first `\n`, or the whole text when there is none.
#[must_use]
pub fn first_line(text: Option<&str>) -> &str {
    text.and_then(|t| t.split('\n').next()).unwrap_or("")
}

/// Web link for a post: the author handle plus the record key, which is the
/// last path segment of the post's `at://` URI.
#[must_use]
pub fn post_url(handle: &str, uri: &str) -> String {
    let rkey = uri.rsplit_once('/').map_or("", |(_, key)| key);
    if handle.is_empty() || rkey.is_empty() {
        return String::new();
    }
    format!("{BSKY_WEB_BASE}/profile/{handle}/post/{rkey}")
}

/// Render an API timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Timestamps without an offset are taken as UTC. Anything unparseable is
/// passed through untouched.
#[must_use]
pub fn format_post_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::new();
    };

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc()));

    match parsed {
        Ok(dt) => dt.format(REPORT_TIME_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Parse a timestamp previously rendered by [`format_post_date`].
#[must_use]
pub fn parse_report_time(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, REPORT_TIME_FORMAT)
        .ok()
        .map(|n| n.and_utc())
}

mod report_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::constants::REPORT_TIME_FORMAT;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(REPORT_TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_report_time(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid report timestamp '{s}'")))
    }
}
