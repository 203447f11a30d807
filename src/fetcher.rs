//! Cursor pagination over an author feed.

use tracing::{debug, info};

use crate::actor::ActorRef;
use crate::bsky::{FeedSource, RawPost};
use crate::constants::MAX_PAGE_SIZE;
use crate::error::ReportError;

/// Fetch up to `limit` of the actor's most recent posts, newest first.
///
/// Pages are requested one after another, each with the cursor returned by
/// the previous one. Fetching stops once `limit` posts are collected, when
/// the API hands back no cursor, or when a page is empty. Errors are
/// returned as-is; nothing collected before the failure is kept.
///
/// # Errors
///
/// Returns [`ReportError::InvalidActor`] without touching the network when
/// `actor` is empty or malformed, and propagates fetch and decode errors
/// from `source`.
pub async fn fetch_posts<S>(
    source: &S,
    actor: &str,
    limit: usize,
) -> Result<Vec<RawPost>, ReportError>
where
    S: FeedSource + ?Sized,
{
    let actor = ActorRef::parse(actor)?;
    fetch_posts_for(source, &actor, limit).await
}

/// [`fetch_posts`] for an already-validated actor.
///
/// # Errors
///
/// Propagates fetch and decode errors from `source`.
pub async fn fetch_posts_for<S>(
    source: &S,
    actor: &ActorRef,
    limit: usize,
) -> Result<Vec<RawPost>, ReportError>
where
    S: FeedSource + ?Sized,
{
    let mut posts: Vec<RawPost> = Vec::with_capacity(limit.min(MAX_PAGE_SIZE));
    let mut cursor: Option<String> = None;
    let mut page = 0u32;

    while posts.len() < limit {
        let page_size = (limit - posts.len()).min(MAX_PAGE_SIZE);
        page += 1;

        let batch = source
            .get_author_feed(actor.as_str(), page_size, cursor.as_deref())
            .await?;

        debug!(
            actor = %actor,
            page,
            received = batch.posts.len(),
            has_cursor = batch.cursor.is_some(),
            "Fetched feed page"
        );

        if batch.posts.is_empty() {
            break;
        }
        posts.extend(batch.posts);

        match batch.cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    posts.truncate(limit);
    info!(actor = %actor, fetched = posts.len(), pages = page, "Finished fetching posts");

    Ok(posts)
}
