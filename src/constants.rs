//! Shared constants used across the application.

/// Public, unauthenticated Bluesky AppView XRPC endpoint.
pub const BSKY_API_BASE: &str = "https://public.api.bsky.app/xrpc";

/// Base URL of the Bluesky web client, used to build post links.
pub const BSKY_WEB_BASE: &str = "https://bsky.app";

/// Server-side cap on `getAuthorFeed` page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// Suffix appended to bare usernames that carry no domain.
pub const DEFAULT_HANDLE_DOMAIN: &str = "bsky.social";

/// User agent string sent with every upstream request.
pub const USER_AGENT: &str = concat!("bsky-post-reporter/", env!("CARGO_PKG_VERSION"));

/// Timestamp layout used for `post_date` and `generated_at`.
pub const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
