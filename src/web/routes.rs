use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::pages;
use super::AppState;
use crate::error::ReportError;
use crate::export::{render, OutputFormat};
use crate::pipeline::build_user_report;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/report", post(report_page))
        .route("/api/report", get(api_report))
        .route("/api/report/:actor", get(api_report_for))
        .route("/healthz", get(health))
}

// ========== HTML Routes ==========

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(pages::render_index(None, "", state.config.default_post_limit).into_string())
}

#[derive(Debug, Deserialize)]
pub struct ReportForm {
    #[serde(default)]
    handle: String,
    #[serde(default)]
    limit: Option<String>,
}

async fn report_page(State(state): State<AppState>, Form(form): Form<ReportForm>) -> Response {
    let requested = form
        .limit
        .as_deref()
        .and_then(|l| l.trim().parse::<usize>().ok());
    let limit = state.config.clamp_limit(requested);
    let handle = form.handle.trim();

    if handle.is_empty() {
        let html = pages::render_index(Some("Please enter a Bluesky handle"), "", limit);
        return (StatusCode::BAD_REQUEST, Html(html.into_string())).into_response();
    }

    match build_user_report(state.source.as_ref(), handle, limit).await {
        Ok(user_report) => {
            let now = chrono::Utc::now();
            Html(pages::render_report(&user_report, limit, now).into_string()).into_response()
        }
        Err(e) => {
            tracing::warn!(actor = %handle, kind = e.kind_name(), "Report failed: {e}");
            let message = e.to_string();
            let html = pages::render_index(Some(&message), handle, limit);
            (status_of(&e), Html(html.into_string())).into_response()
        }
    }
}

// ========== API Routes ==========

/// Query parameters are taken as strings and parsed here so that a bad
/// value still gets a JSON answer.
#[derive(Debug, Deserialize)]
pub struct ApiReportParams {
    #[serde(default)]
    actor: Option<String>,
    #[serde(default)]
    limit: Option<String>,
    #[serde(default)]
    format: Option<String>,
}

impl ApiReportParams {
    /// Unparseable or empty limits fall back to the configured default.
    fn limit(&self) -> Option<usize> {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
    }

    fn format(&self) -> Result<OutputFormat, String> {
        match self.format.as_deref().map(str::trim) {
            None | Some("") => Ok(OutputFormat::default()),
            Some(format) => format.parse(),
        }
    }
}

async fn api_report(State(state): State<AppState>, Query(params): Query<ApiReportParams>) -> Response {
    let actor = params.actor.clone().unwrap_or_default();
    respond_with_report(&state, &actor, &params).await
}

async fn api_report_for(
    State(state): State<AppState>,
    Path(actor): Path<String>,
    Query(params): Query<ApiReportParams>,
) -> Response {
    respond_with_report(&state, &actor, &params).await
}

async fn respond_with_report(state: &AppState, actor: &str, params: &ApiReportParams) -> Response {
    let format = match params.format() {
        Ok(format) => format,
        Err(message) => {
            tracing::warn!(actor = %actor, "API report rejected: {message}");
            return json_error(StatusCode::BAD_REQUEST, &message, "invalid_format");
        }
    };
    let limit = state.config.clamp_limit(params.limit());

    let result = match build_user_report(state.source.as_ref(), actor, limit).await {
        Ok(user_report) => render(&user_report.report, format),
        Err(e) => Err(e),
    };

    match result {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, format.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(actor = %actor, kind = e.kind_name(), "API report failed: {e}");
            error_response(&e)
        }
    }
}

fn status_of(err: &ReportError) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_GATEWAY)
}

fn error_response(err: &ReportError) -> Response {
    json_error(status_of(err), &err.to_string(), err.kind_name())
}

fn json_error(status: StatusCode, error: &str, kind: &str) -> Response {
    (
        status,
        Json(json!({
            "error": error,
            "kind": kind,
        })),
    )
        .into_response()
}

async fn health() -> &'static str {
    "ok"
}
