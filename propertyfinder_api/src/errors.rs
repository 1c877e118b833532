//! Error types for the fetch layer.

use std::fmt;

/// Why a single fetch attempt failed. Used for diagnostics and carried
/// into [`Error::RetriesExhausted`] once the attempt budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The per-request timeout elapsed.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// The server answered with a non-success status.
    HttpStatus(u16),
    /// The response body could not be read or decoded as text.
    Body,
    /// Any other transport-level failure.
    Request,
}

impl FailureKind {
    /// Classifies a transport error returned by `reqwest`.
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect
        } else if let Some(status) = err.status() {
            Self::HttpStatus(status.as_u16())
        } else if err.is_body() || err.is_decode() {
            Self::Body
        } else {
            Self::Request
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Connect => write!(f, "connection error"),
            Self::HttpStatus(status) => write!(f, "HTTP error {}", status),
            Self::Body => write!(f, "failed to read response body"),
            Self::Request => write!(f, "request error"),
        }
    }
}

/// Errors that can occur when fetching a page.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The URL could not be parsed or has no usable origin.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The shared HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Every attempt failed; `last` is the failure of the final attempt.
    #[error("giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: FailureKind,
    },
}
