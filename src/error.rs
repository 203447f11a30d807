//! Error taxonomy for the report pipeline.
//!
//! Every failure is terminal for a single report request: the pipeline
//! either produces a complete report or returns one of these errors.

use std::fmt;

use thiserror::Error;

/// Class of a failed upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The call did not complete within the configured timeout.
    Timeout,
    /// No connection could be established.
    Connect,
    /// The API answered 429 Too Many Requests.
    RateLimited,
    /// The API answered with another non-success status.
    Status(u16),
    /// Any other transport-level failure (TLS, body read, redirect loop).
    Transport,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timed out"),
            Self::Connect => f.write_str("connection failed"),
            Self::RateLimited => f.write_str("rate limited (HTTP 429)"),
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Transport => f.write_str("transport error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid actor '{actor}': {reason}")]
    InvalidActor { actor: String, reason: &'static str },

    #[error("{endpoint} {kind}: {message}")]
    Fetch {
        endpoint: &'static str,
        kind: FetchErrorKind,
        message: String,
    },

    #[error("malformed response from {endpoint}: {message}")]
    MalformedResponse {
        endpoint: &'static str,
        message: String,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(String),
}

impl ReportError {
    /// Short machine-readable name of the failure class.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::InvalidActor { .. } => "invalid_actor",
            Self::Fetch { .. } => "fetch_error",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Serialize(_) => "serialize_error",
        }
    }

    /// Process exit code used by the CLI.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidActor { .. } => 2,
            Self::Fetch { .. } => 3,
            Self::MalformedResponse { .. } => 4,
            Self::Serialize(_) => 1,
        }
    }

    /// HTTP status used by the web adapter.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidActor { .. } => 400,
            Self::Fetch { kind, .. } => match kind {
                FetchErrorKind::RateLimited => 429,
                FetchErrorKind::Timeout => 504,
                // getProfile answers 400 for unknown actors
                FetchErrorKind::Status(400 | 404) => 404,
                FetchErrorKind::Status(_)
                | FetchErrorKind::Connect
                | FetchErrorKind::Transport => 502,
            },
            Self::MalformedResponse { .. } => 502,
            Self::Serialize(_) => 500,
        }
    }

    pub(crate) fn from_reqwest(endpoint: &'static str, err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FetchErrorKind::Timeout
        } else if err.is_connect() {
            FetchErrorKind::Connect
        } else if let Some(status) = err.status() {
            status_kind(status.as_u16())
        } else {
            FetchErrorKind::Transport
        };
        Self::Fetch {
            endpoint,
            kind,
            message: err.to_string(),
        }
    }
}

pub(crate) fn status_kind(status: u16) -> FetchErrorKind {
    if status == 429 {
        FetchErrorKind::RateLimited
    } else {
        FetchErrorKind::Status(status)
    }
}
