//! Unexpected failures while talking to the target API.
//!
//! A non-2xx status is not an error here: the client reports it as a failed
//! check. These variants cover what the run cannot continue past.

use shop_probe_core::EmailError;
use thiserror::Error;

/// Errors that end a probe run.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request did not complete (connection refused, timeout, ...).
    #[error("request to {path} failed: {source}")]
    Request {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body was not the JSON we expected.
    #[error("response from {path} is not valid JSON: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// A successful response lacked a required field.
    #[error("response from {path} has no {field:?} field")]
    MissingField { path: String, field: &'static str },

    /// A successful response carried a required field with the wrong JSON type.
    #[error("response from {path} has a {found} {field:?} field, expected {expected}")]
    WrongType {
        path: String,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The generated identity was not a valid email.
    #[error("invalid identity: {0}")]
    Identity(#[from] EmailError),
}

impl ProbeError {
    /// Whether the failure was a request timing out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Request { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}
