//! Blocking HTTP transport used by the API client.
//!
//! The transport executes exactly one HTTP exchange per call and never
//! retries. Implementations must be safe to share between threads; the
//! reqwest implementation reuses its connection pool across calls.

use std::time::Duration;

use http::StatusCode;
use reqwest::blocking::Client;

use super::error::{ClientError, TransportFailureKind};
use super::request::PreparedRequest;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body decoded as UTF-8.
    pub body: String,
}

impl RawResponse {
    /// Builds a response from a status and body.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Executes prepared requests.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` once, waiting at most `timeout` when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when no HTTP response was received.
    fn execute(
        &self,
        request: &PreparedRequest,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, ClientError>;
}

/// reqwest-backed blocking transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport with a `bbpr/<version>` user agent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] when the TLS backend or HTTP
    /// client cannot be initialised.
    pub fn new() -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(concat!("bbpr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| ClientError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;
        Ok(Self::with_client(client))
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(
        &self,
        request: &PreparedRequest,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, ClientError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }
        if let Some(deadline) = timeout {
            builder = builder.timeout(deadline);
        }

        let response = builder.send().map_err(|error| map_reqwest_error(&error))?;
        let status = response.status();
        let body = response.text().map_err(|error| map_reqwest_error(&error))?;
        Ok(RawResponse { status, body })
    }
}

fn map_reqwest_error(error: &reqwest::Error) -> ClientError {
    let kind = if error.is_timeout() {
        TransportFailureKind::Timeout
    } else if error.is_connect() {
        TransportFailureKind::Connect
    } else {
        TransportFailureKind::Other
    };
    ClientError::Transport {
        kind,
        message: error.to_string(),
    }
}
