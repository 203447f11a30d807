//! Bluesky AppView access: wire types and the HTTP transport.

mod client;
mod models;

pub use client::{BlueskyClient, FeedPage, FeedSource};
pub use models::{Profile, RawPost};
