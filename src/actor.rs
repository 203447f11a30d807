//! Actor references: a DID or a handle, validated for shape only.
//!
//! Resolution to a canonical DID is left to the remote API; this module only
//! guarantees that nothing obviously malformed ever reaches the network.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::constants::DEFAULT_HANDLE_DOMAIN;
use crate::error::ReportError;

static DID_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^did:[a-z]+:[a-zA-Z0-9._:%-]*[a-zA-Z0-9._-]$").unwrap()
});

static HANDLE_PATTERN: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(
        r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$",
    )
    .unwrap()
});

// Handles are capped at 253 characters, DIDs at 2 KiB.
const MAX_HANDLE_LEN: usize = 253;
const MAX_DID_LEN: usize = 2048;

/// A validated account reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActorRef {
    Did(String),
    Handle(String),
}

impl ActorRef {
    /// Normalize and validate user input.
    ///
    /// Surrounding whitespace and a leading `@` are removed, and a bare
    /// username without a dot is completed with `.bsky.social`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidActor`] when the input is empty or is
    /// neither DID-shaped nor handle-shaped.
    pub fn parse(input: &str) -> Result<Self, ReportError> {
        let trimmed = input.trim();
        let invalid = |reason| ReportError::InvalidActor {
            actor: input.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(invalid("actor is empty"));
        }

        let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);
        if bare.is_empty() {
            return Err(invalid("actor is empty"));
        }

        if bare.starts_with("did:") {
            if bare.len() > MAX_DID_LEN || !DID_PATTERN.is_match(bare) {
                return Err(invalid("not a well-formed DID"));
            }
            return Ok(Self::Did(bare.to_string()));
        }

        let handle = if bare.contains('.') {
            bare.to_lowercase()
        } else {
            format!("{}.{DEFAULT_HANDLE_DOMAIN}", bare.to_lowercase())
        };

        if handle.len() > MAX_HANDLE_LEN || !HANDLE_PATTERN.is_match(&handle) {
            return Err(invalid("not a well-formed handle or DID"));
        }

        Ok(Self::Handle(handle))
    }

    /// The identifier as sent to the API's `actor` parameter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Did(s) | Self::Handle(s) => s,
        }
    }

    #[must_use]
    pub fn is_did(&self) -> bool {
        matches!(self, Self::Did(_))
    }
}

impl FromStr for ActorRef {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_did() {
        let actor = ActorRef::parse("did:plc:z72i7hdynmk6r22z27h6tvur").unwrap();
        assert!(actor.is_did());
        assert_eq!(actor.as_str(), "did:plc:z72i7hdynmk6r22z27h6tvur");

        let actor = ActorRef::parse("  did:web:example.com ").unwrap();
        assert_eq!(actor, ActorRef::Did("did:web:example.com".to_string()));
    }

    #[test]
    fn test_parse_handle_normalization() {
        assert_eq!(
            ActorRef::parse("@alice.bsky.social").unwrap(),
            ActorRef::Handle("alice.bsky.social".to_string())
        );
        assert_eq!(
            ActorRef::parse("alice").unwrap(),
            ActorRef::Handle("alice.bsky.social".to_string())
        );
        assert_eq!(
            ActorRef::parse("Example.COM").unwrap(),
            ActorRef::Handle("example.com".to_string())
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        for input in ["", "   ", "@"] {
            let err = ActorRef::parse(input).unwrap_err();
            assert!(matches!(err, ReportError::InvalidActor { .. }), "{input:?}");
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "did:",
            "did:PLC:abc",
            "did:plc:",
            "has space.bsky.social",
            "alice..bsky.social",
            "-alice.bsky.social",
            "alice.bsky.social/post",
            "https://bsky.app/profile/alice",
        ] {
            assert!(ActorRef::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_display_matches_as_str() {
        let actor: ActorRef = "bob.dev".parse().unwrap();
        assert_eq!(actor.to_string(), "bob.dev");
    }
}
