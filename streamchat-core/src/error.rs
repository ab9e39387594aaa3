//! Error types for one streamed exchange.

use thiserror::Error;

/// Why a streamed exchange failed.
///
/// Every variant is terminal for the `send` call that produced it and is
/// delivered exactly once, inside [`StreamOutcome::Failed`](crate::StreamOutcome::Failed).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StreamError {
    /// Connectivity failure: DNS, connection refused or reset, or a read
    /// error while the body was streaming.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The network layer gave up waiting for the server.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The response body was not valid UTF-8 text.
    #[error("decode error: {0}")]
    Decode(String),
}

impl StreamError {
    /// Build a [`StreamError::Network`] from a plain message.
    pub fn network(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Network(message.into())
    }

    /// Whether this is a network-layer failure (`Network` or `Timeout`).
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }

    /// The HTTP status code, if the server answered with a non-2xx status.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether sending the same request again might succeed.
    ///
    /// Nothing in this workspace retries; callers may use this to decide
    /// whether to offer a "try again" action.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::HttpStatus { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::Decode(_) => false,
        }
    }
}
