//! Bluesky post reporter library.
//!
//! Fetches an account's recent posts from the public Bluesky AppView,
//! flattens them into report rows with engagement counts, and serializes the
//! result as JSON or CSV. The same pipeline backs the CLI and the web UI.

pub mod actor;
pub mod bsky;
pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod pipeline;
pub mod report;
pub mod web;

pub use actor::ActorRef;
pub use bsky::{BlueskyClient, FeedPage, FeedSource, Profile, RawPost};
pub use error::{FetchErrorKind, ReportError};
pub use export::OutputFormat;
pub use fetcher::fetch_posts;
pub use pipeline::{build_user_report, generate_report, UserReport};
pub use report::{build_report, Report, ReportRow};
