//! Error types exposed by the Bitbucket client layer.

use thiserror::Error;

/// Classifies a transport failure that never reached the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    /// DNS resolution or TCP/TLS connection failed.
    Connect,
    /// The per-call deadline elapsed before a response arrived.
    Timeout,
    /// Any other transport problem (request construction, broken body).
    Other,
}

/// Errors surfaced while addressing or talking to the Bitbucket API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("network error talking to Bitbucket: {message}")]
    Transport {
        /// Broad category of the failure.
        kind: TransportFailureKind,
        /// Transport-level error detail.
        message: String,
    },

    /// Bitbucket answered with a non-success status.
    #[error("Bitbucket API error (status code: {status}): {message}")]
    RemoteApi {
        /// Numeric HTTP status code.
        status: u16,
        /// Status text, followed by the service's error message when present.
        message: String,
    },

    /// A success response did not match the expected document shape.
    #[error("unexpected {operation} response from Bitbucket: {message}")]
    Decode {
        /// Operation whose response failed to decode.
        operation: String,
        /// Decoder error detail.
        message: String,
    },

    /// The caller's cancellation token fired before a request was sent.
    #[error("request cancelled before it was sent")]
    Cancelled,

    /// A descriptor value (target, credential, id, API root) was rejected.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Which value was rejected and why.
        message: String,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl ClientError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn decode(operation: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            operation: operation.to_owned(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status for [`ClientError::RemoteApi`] failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when Bitbucket rejected the request input (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::RemoteApi { status: 400..=499, .. })
    }

    /// True when Bitbucket failed to serve a valid request (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::RemoteApi { status: 500..=599, .. })
    }

    /// True when the per-call deadline elapsed.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportFailureKind::Timeout,
                ..
            }
        )
    }
}
