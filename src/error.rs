//! Monitor error types.
//!
//! [`MonitorError`] is the central error type for the library. Transport
//! failures on the realtime socket never surface here: they are absorbed by
//! the reconnect loop and reported through connection-state transitions.

use reqwest::StatusCode;

/// Library error enum.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// A configured URL could not be parsed or has the wrong scheme.
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl {
        /// The offending URL string.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The REST backend answered with a non-success status.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status returned by the backend.
        status: StatusCode,
        /// Backend-provided `error` field, or the status line.
        message: String,
    },

    /// HTTP transport failure (connect, timeout, body read).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An inbound frame is valid JSON but not a `type`-tagged object.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// A server message could not be decoded into a known variant.
    #[error("unrecognized message type: {0}")]
    UnknownMessage(String),
}

impl MonitorError {
    /// Returns the HTTP status for [`MonitorError::Api`] errors, or the
    /// status carried by a [`reqwest::Error`] if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            Self::InvalidUrl { .. }
            | Self::Serialization(_)
            | Self::InvalidFrame(_)
            | Self::UnknownMessage(_) => None,
        }
    }
}
