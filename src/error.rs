//! Error types for query building, execution, and transport.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
    /// Whether the error was a request error.
    pub is_request: bool,
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
            is_request: err.is_request(),
        }
    }
}

/// GraphQL error location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    /// Line number in the query (1-based).
    pub line: u32,
    /// Column number in the query (1-based).
    pub column: u32,
}

/// GraphQL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    /// Field name.
    Key(String),
    /// Array index.
    Index(i64),
}

/// GraphQL error (per GraphQL spec).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
    /// Location(s) within the query.
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    /// Path within the response where the error occurred.
    #[serde(default)]
    pub path: Vec<GraphqlPathSegment>,
    /// Extensions metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

/// Error type covering query construction, rendering, merging, and transport.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// HTTP/network error.
    #[error("HTTP error: {0:?}")]
    Http(HttpErrorInfo),

    /// HTTP response status error.
    #[error("HTTP status {status} with body: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: StatusCode,
        /// Response body (truncated if needed).
        body: String,
        /// Retry-After duration when supplied.
        retry_after: Option<Duration>,
    },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(String),

    /// A variable name was declared twice on the same query.
    #[error("variable \"{name}\" was already declared")]
    DuplicateVariable {
        /// Variable name.
        name: String,
    },

    /// A variable was referenced without being declared.
    #[error("variable \"{name}\" was never declared")]
    UndeclaredVariable {
        /// Variable name.
        name: String,
    },

    /// The query root has no fields to select.
    #[error("query has no fields to select")]
    NoSelection,

    /// A connection field has no child selection.
    #[error("connection \"{path}\" has no child selection")]
    MissingSelection {
        /// Slash-joined field path.
        path: String,
    },

    /// A filter value is not a variable, number, string, or sequence thereof.
    #[error("unsupported filter value for \"{key}\" at \"{path}\"")]
    UnsupportedFilterValue {
        /// Slash-joined field path.
        path: String,
        /// Filter key.
        key: String,
    },

    /// The response shape does not match the selection tree.
    #[error("unexpected response shape at \"{path}\": expected {expected}")]
    MalformedResponse {
        /// Slash-joined field path.
        path: String,
        /// Expected shape.
        expected: String,
    },

    /// The server returned GraphQL-level errors.
    #[error("query failed: {errors:?}")]
    QueryFailed {
        /// GraphQL error list.
        errors: Vec<GraphqlError>,
    },
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl QueryError {
    /// Returns `true` if the error is retryable at the transport level.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(info) => info.is_timeout || info.is_connect || info.is_request,
            Self::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}
