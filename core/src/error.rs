//! Error types for the request controller.
//!
//! # Design
//! The controller never returns these from `start` or `cancel`. Transport
//! failures and bad responses are folded into a `FetchError` and delivered
//! through `RequestState::Error`, so a listener is the only place a caller
//! observes them. `ParamsError` is the one error raised directly, and only
//! while building request parameters, before any request exists.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Message carried by every non-2xx `FetchError`.
pub const HTTP_ERROR_MESSAGE: &str = "Error Loading Data!";

/// Message carried when a response body is not valid JSON.
pub const PARSE_ERROR_MESSAGE: &str = "error while parsing response body";

/// Failures reported by a `Transport` or one of its handles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be opened (bad URL, unsupported scheme, ...).
    #[error("failed to open request: {0}")]
    Open(String),

    /// The exchange failed before a response arrived.
    #[error("network failure: {0}")]
    Network(String),

    /// The exchange was aborted before it completed.
    #[error("request aborted")]
    Aborted,
}

/// Errors raised while building `RequestParams`.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Which stage of the exchange produced a `FetchError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchErrorKind {
    /// The transport failed; status is best-effort and usually 0.
    Network,
    /// The server answered with a status outside [200,300).
    Http,
    /// The body could not be parsed as JSON.
    Parse,
}

/// Payload of `RequestState::Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message} (status {status} {status_text})")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub status: u16,
    pub status_text: String,
    pub raw_body: String,
    /// Parsed body, when one was available and declared as JSON.
    pub data: Option<Value>,
    pub message: String,
}

impl FetchError {
    pub fn network(err: &TransportError) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            status: 0,
            status_text: String::new(),
            raw_body: String::new(),
            data: None,
            message: err.to_string(),
        }
    }

    pub fn http(status: u16, status_text: &str, raw_body: &str, data: Option<Value>) -> Self {
        Self {
            kind: FetchErrorKind::Http,
            status,
            status_text: status_text.to_string(),
            raw_body: raw_body.to_string(),
            data,
            message: HTTP_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn parse(status: u16, status_text: &str, raw_body: &str) -> Self {
        Self {
            kind: FetchErrorKind::Parse,
            status,
            status_text: status_text.to_string(),
            raw_body: raw_body.to_string(),
            data: None,
            message: PARSE_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message_and_status() {
        let err = FetchError::http(404, "Not Found", "", None);
        assert_eq!(err.to_string(), "Error Loading Data! (status 404 Not Found)");
    }

    #[test]
    fn network_error_has_zero_status() {
        let err = FetchError::network(&TransportError::Network("connection refused".into()));
        assert_eq!(err.kind, FetchErrorKind::Network);
        assert_eq!(err.status, 0);
        assert!(err.status_text.is_empty());
        assert_eq!(err.message, "network failure: connection refused");
    }

    #[test]
    fn serializes_camel_case() {
        let err = FetchError::parse(200, "OK", "nope");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "parse");
        assert_eq!(json["statusText"], "OK");
        assert_eq!(json["rawBody"], "nope");
        assert!(json["data"].is_null());
    }
}
