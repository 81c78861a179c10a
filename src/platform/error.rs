// ABOUTME: Control-plane error types with SNAFU pattern.
// ABOUTME: Unifies request, response, and HTTP failures for programmatic handling.

use snafu::Snafu;

/// Failure of a single control-plane or HTTP call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PlatformError {
    #[snafu(display("{operation} request failed: {message}"))]
    Request {
        operation: &'static str,
        message: String,
    },

    #[snafu(display("{operation} returned an unusable response: {message}"))]
    MalformedResponse {
        operation: &'static str,
        message: String,
    },

    #[snafu(display("HTTP request to {url} failed: {source}"))]
    Http { url: String, source: reqwest::Error },

    #[snafu(display("failed to build HTTP client: {source}"))]
    HttpClient { source: reqwest::Error },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformErrorKind {
    /// The provider rejected or failed the call.
    Request,
    /// The provider answered with something we cannot interpret.
    MalformedResponse,
    /// Plain HTTP transport failure (health probe or log download).
    Http,
}

impl PlatformError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PlatformErrorKind {
        match self {
            PlatformError::Request { .. } => PlatformErrorKind::Request,
            PlatformError::MalformedResponse { .. } => PlatformErrorKind::MalformedResponse,
            PlatformError::Http { .. } | PlatformError::HttpClient { .. } => {
                PlatformErrorKind::Http
            }
        }
    }

    /// Shorthand for a failed provider call.
    pub fn request(operation: &'static str, message: impl Into<String>) -> Self {
        PlatformError::Request {
            operation,
            message: message.into(),
        }
    }
}
