//! The report pipeline shared by the CLI and the web UI.
//!
//! resolve actor → paginate feed → build rows → serialize. Each call runs
//! strictly in sequence and owns nothing but the borrowed transport.

use tracing::info;

use crate::actor::ActorRef;
use crate::bsky::{FeedSource, Profile};
use crate::error::ReportError;
use crate::export::{render, OutputFormat};
use crate::fetcher::fetch_posts_for;
use crate::report::{build_report, Report};

/// A report together with the profile it was built for.
#[derive(Debug, Clone)]
pub struct UserReport {
    pub profile: Profile,
    pub report: Report,
}

/// Resolve `actor` and build its report from the `limit` most recent posts.
///
/// # Errors
///
/// Returns [`ReportError::InvalidActor`] before any network call when the
/// actor is malformed, otherwise the first fetch or decode failure.
pub async fn build_user_report<S>(
    source: &S,
    actor: &str,
    limit: usize,
) -> Result<UserReport, ReportError>
where
    S: FeedSource + ?Sized,
{
    let actor = ActorRef::parse(actor)?;

    let profile = source.get_profile(&actor).await?;
    if profile.did.is_empty() {
        return Err(ReportError::MalformedResponse {
            endpoint: "app.bsky.actor.getProfile",
            message: "profile has an empty did".to_string(),
        });
    }
    info!(actor = %actor, did = %profile.did, handle = %profile.handle, "Resolved actor");

    // Page by DID so a handle change mid-fetch cannot split the feed.
    let did = ActorRef::Did(profile.did.clone());
    let posts = fetch_posts_for(source, &did, limit).await?;
    let report = build_report(&profile, &posts);

    Ok(UserReport { profile, report })
}

/// Run the whole pipeline and return the serialized report.
///
/// # Errors
///
/// See [`build_user_report`]; additionally fails if serialization fails.
pub async fn generate_report<S>(
    source: &S,
    actor: &str,
    limit: usize,
    format: OutputFormat,
) -> Result<Vec<u8>, ReportError>
where
    S: FeedSource + ?Sized,
{
    let UserReport { report, .. } = build_user_report(source, actor, limit).await?;
    render(&report, format)
}
