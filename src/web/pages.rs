//! Page rendering for the search form and the report view.

use chrono::{DateTime, Utc};
use maud::{html, Markup, Render};
use url::form_urlencoded;

use crate::components::{Alert, BaseLayout, Table, TableRow};
use crate::pipeline::UserReport;
use crate::report::{parse_report_time, ReportRow};

/// Home page with the handle form, optionally showing an error.
pub fn render_index(error: Option<&str>, handle: &str, limit: usize) -> Markup {
    let content = html! {
        h1 { "Bluesky Post Reporter" }
        p { "Enter a Bluesky handle or DID to summarize the account's recent posts." }
        @if let Some(message) = error {
            (Alert::error(message).with_title("Error:"))
        }
        form action="/report" method="post" {
            label for="handle" { "Handle or DID" }
            input type="text" id="handle" name="handle" value=(handle)
                placeholder="alice.bsky.social" required autofocus;
            label for="limit" { "Posts" }
            input type="number" id="limit" name="limit" value=(limit) min="1";
            button type="submit" { "Generate report" }
        }
    };
    BaseLayout::new("Home").render(content)
}

/// Report view: profile header, download links and a table of posts.
pub fn render_report(user_report: &UserReport, limit: usize, now: DateTime<Utc>) -> Markup {
    let UserReport { profile, report } = user_report;
    let title = format!("@{}", report.handle());

    let rows: Vec<Markup> = report
        .posts()
        .iter()
        .map(|row| post_row(row, now))
        .collect();

    let content = html! {
        section class="profile" {
            h1 {
                @if let Some(name) = profile.display_name.as_deref().filter(|n| !n.is_empty()) {
                    (name) " "
                }
                span class="muted" { "@" (report.handle()) }
            }
            p class="muted" { code { (report.did()) } }
            div class="profile-stats" {
                span { strong { (profile.followers_count.unwrap_or(0)) } " followers" }
                span { strong { (profile.follows_count.unwrap_or(0)) } " following" }
                span { strong { (profile.posts_count.unwrap_or(0)) } " posts" }
            }
        }
        p {
            "Showing " (report.post_count()) " posts, generated "
            (report.generated_at().format(crate::constants::REPORT_TIME_FORMAT).to_string())
            ". Download: "
            a href=(download_href(report.did(), limit, "json")) { "JSON" }
            " | "
            a href=(download_href(report.did(), limit, "csv")) { "CSV" }
        }
        @if rows.is_empty() {
            (Alert::info("This account has no posts yet."))
        } @else {
            (Table::new(vec!["Posted", "First line", "Likes", "Reposts", "Replies", "Quotes"])
                .class("posts-table")
                .rows(rows))
        }
    };

    BaseLayout::new(&title).render(content)
}

fn post_row(row: &ReportRow, now: DateTime<Utc>) -> Markup {
    let posted = html! {
        span title=(row.post_date) { (relative_time(&row.post_date, now)) }
    };
    let text = if row.first_line.is_empty() {
        "(no text)"
    } else {
        row.first_line.as_str()
    };
    let first_line = if row.post_url.is_empty() {
        html! { (text) }
    } else {
        html! { a href=(row.post_url) target="_blank" rel="noopener noreferrer" { (text) } }
    };

    TableRow::new()
        .cell_markup(posted)
        .cell_markup(first_line)
        .num(row.likes)
        .num(row.reposts)
        .num(row.replies)
        .num(row.quotes)
        .render()
}

fn download_href(did: &str, limit: usize, format: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("actor", did)
        .append_pair("limit", &limit.to_string())
        .append_pair("format", format)
        .finish();
    format!("/api/report?{query}")
}

/// Human-friendly age of a `post_date` string relative to `now`.
///
/// Falls back to the input when it is not a report timestamp.
#[must_use]
fn relative_time(post_date: &str, now: DateTime<Utc>) -> String {
    let Some(posted) = parse_report_time(post_date) else {
        return post_date.to_string();
    };

    let seconds = (now - posted).num_seconds();
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else if seconds < 604_800 {
        format!("{}d ago", seconds / 86_400)
    } else {
        posted.format("%b %d, %Y").to_string()
    }
}
