//! # Framework Errors
//!
//! This module defines the error taxonomy shared by every resource type.
//!
//! - [`TransportError`]: the `GET` itself failed (connection, status, body read).
//! - [`DecodeError`]: the body is not well-formed JSON or does not match the shape.
//! - [`CollectionError`]: aggregate of per-URI failures from a batch fetch.
//! - [`RedfishError`]: the umbrella returned by single-resource operations.
//!
//! Single fetches propagate their error as-is. Batch fetches never do: they fold
//! every failure into one [`CollectionError`] that travels alongside the partial
//! results (see [`crate::resolver::Resolved`]).

use std::collections::HashMap;
use std::fmt;

/// Errors raised by a [`Client`](crate::Client) while performing a request.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be sent or no response was received.
    #[error("request to {uri} failed: {message}")]
    Request { uri: String, message: String },

    /// The service answered with a non-success status code.
    #[error("{uri} returned HTTP {status}: {message}")]
    Status {
        uri: String,
        status: u16,
        message: String,
    },

    /// The response body stream could not be read to the end.
    #[error("reading body of {uri} failed: {message}")]
    Body { uri: String, message: String },

    /// The client configuration is unusable.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl TransportError {
    /// HTTP status code, when the failure came from the service.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Human-readable message for a failed response.
///
/// Prefers the Redfish `error.message`, then the first
/// `error.@Message.ExtendedInfo[].Message`, then the raw body text.
pub(crate) fn status_message(status: u16, body: &[u8]) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .or_else(|| {
            error
                .and_then(|e| e.get("@Message.ExtendedInfo"))
                .and_then(|info| info.get(0))
                .and_then(|first| first.get("Message"))
                .and_then(|m| m.as_str())
        });

    match message {
        Some(message) => message.to_string(),
        None => {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            if text.is_empty() {
                format!("HTTP {status}")
            } else {
                text.chars().take(256).collect()
            }
        }
    }
}

/// Errors raised while turning a JSON document into a typed record.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed resource JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A link set declared a count that differs from the links it carries.
    #[error("{name}@odata.count declares {declared} links but {actual} were decoded")]
    CountMismatch {
        name: String,
        declared: usize,
        actual: usize,
    },

    /// A collection's `Members@odata.nextLink` points back to a page already read.
    #[error("pagination loop detected at {0}")]
    PaginationLoop(String),
}

/// Umbrella error for fetching and decoding a single resource.
#[derive(Debug, thiserror::Error)]
pub enum RedfishError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// The resource was decoded without a client, so its links cannot be followed.
    #[error("resource {odata_id:?} has no client attached")]
    Detached { odata_id: String },

    /// The fetch task panicked or was cancelled before it reported.
    #[error("fetch task did not complete: {message}")]
    Incomplete { message: String },
}

impl RedfishError {
    pub fn is_transport(&self) -> bool {
        matches!(self, RedfishError::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, RedfishError::Decode(_))
    }
}

/// Aggregate of every URI that failed during a batch fetch.
///
/// An empty `CollectionError` means "no error": check [`CollectionError::is_empty`]
/// rather than the presence of the value.
#[derive(Debug, Default)]
pub struct CollectionError {
    failures: HashMap<String, RedfishError>,
}

impl CollectionError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `error` under `uri`, returning any error previously filed there.
    pub fn insert(&mut self, uri: impl Into<String>, error: RedfishError) -> Option<RedfishError> {
        self.failures.insert(uri.into(), error)
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn get(&self, uri: &str) -> Option<&RedfishError> {
        self.failures.get(uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.failures.contains_key(uri)
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.failures.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RedfishError)> {
        self.failures.iter().map(|(uri, err)| (uri.as_str(), err))
    }

    pub fn into_failures(self) -> HashMap<String, RedfishError> {
        self.failures
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return write!(f, "no errors");
        }
        let mut uris: Vec<&String> = self.failures.keys().collect();
        uris.sort();
        write!(f, "failed to retrieve {} item(s):", uris.len())?;
        for uri in uris {
            write!(f, " [{}: {}]", uri, self.failures[uri])?;
        }
        Ok(())
    }
}

impl std::error::Error for CollectionError {}

impl FromIterator<(String, RedfishError)> for CollectionError {
    fn from_iter<I: IntoIterator<Item = (String, RedfishError)>>(iter: I) -> Self {
        Self {
            failures: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_err(uri: &str, status: u16) -> RedfishError {
        TransportError::Status {
            uri: uri.to_string(),
            status,
            message: "boom".to_string(),
        }
        .into()
    }

    #[test]
    fn test_empty_collection_error_reads_as_no_error() {
        let err = CollectionError::new();
        assert!(err.is_empty());
        assert_eq!(err.len(), 0);
        assert_eq!(err.to_string(), "no errors");
    }

    #[test]
    fn test_collection_error_display_lists_uris_sorted() {
        let mut err = CollectionError::new();
        err.insert("/b", status_err("/b", 500));
        err.insert("/a", status_err("/a", 404));

        let text = err.to_string();
        assert!(text.starts_with("failed to retrieve 2 item(s):"));
        let a = text.find("[/a:").unwrap();
        let b = text.find("[/b:").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_status_message_prefers_redfish_error() {
        let body = br#"{"error": {"code": "Base.1.0.GeneralError", "message": "general failure",
            "@Message.ExtendedInfo": [{"Message": "detail"}]}}"#;
        assert_eq!(status_message(500, body), "general failure");

        let body = br#"{"error": {"@Message.ExtendedInfo": [{"Message": "detail"}]}}"#;
        assert_eq!(status_message(500, body), "detail");

        assert_eq!(status_message(502, b"Bad Gateway\n"), "Bad Gateway");
        assert_eq!(status_message(503, b""), "HTTP 503");
    }

    #[test]
    fn test_transport_status_is_exposed() {
        let err = TransportError::Status {
            uri: "/x".into(),
            status: 503,
            message: "busy".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(
            TransportError::InvalidConfig("no endpoint".into()).status(),
            None
        );
    }
}
