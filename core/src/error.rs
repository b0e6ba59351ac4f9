//! Error types for the Google Books client core.
//!
//! # Design
//! Every failure in the fetch/parse pipeline degrades to an empty result set
//! at the presentation layer, so callers that only render results never see
//! these values. They exist so the failure can be logged and asserted on:
//! `ApiError::kind` collapses the variants into the coarse `FailureKind`
//! taxonomy (network, status, payload, input).

use thiserror::Error;

/// Errors produced while building, executing, or parsing a search request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The search form input was rejected before any request was built.
    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    /// The constructed request URL could not be parsed.
    #[error("invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connecting to the server or receiving the response took too long.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// DNS, connection refused, TLS, or a body read that failed midway.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with something other than 200.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body is not the JSON document we expect.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

/// Coarse classification of an `ApiError`.
///
/// The result list cannot tell "no matches" from "request failed"; this is
/// the code that logs and tests use to tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeouts, DNS, refused connections, malformed URLs.
    Network,
    /// Non-200 HTTP status.
    Status,
    /// Malformed or unexpected JSON.
    Payload,
    /// Rejected search input.
    Input,
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::InvalidQuery(_) => FailureKind::Input,
            ApiError::InvalidUrl { .. } | ApiError::Timeout(_) | ApiError::Transport(_) => {
                FailureKind::Network
            }
            ApiError::HttpError { .. } => FailureKind::Status,
            ApiError::DeserializationError(_) => FailureKind::Payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(ApiError::Timeout("connect".into()).kind(), FailureKind::Network);
        assert_eq!(ApiError::Transport("refused".into()).kind(), FailureKind::Network);
        assert_eq!(
            ApiError::InvalidUrl {
                url: "::".into(),
                reason: "no scheme".into()
            }
            .kind(),
            FailureKind::Network
        );
        assert_eq!(
            ApiError::HttpError {
                status: 503,
                body: String::new()
            }
            .kind(),
            FailureKind::Status
        );
        assert_eq!(ApiError::DeserializationError("eof".into()).kind(), FailureKind::Payload);
        assert_eq!(ApiError::InvalidQuery("empty title".into()).kind(), FailureKind::Input);
    }

    #[test]
    fn display_includes_status_and_body() {
        let err = ApiError::HttpError {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "HTTP 429: rate limited");
    }
}
