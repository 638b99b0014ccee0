//! The network seam.
//!
//! The session consumes a single capability from the outside world:
//! `request(method, path, body, security level)` returning either a JSON
//! document or an ordered stream of text fragments. `HttpTransport` is the
//! reqwest implementation; tests substitute scripted transports.

mod config;
mod http;

pub use config::HttpTransportConfig;
pub use http::HttpTransport;

use std::fmt;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

/// Ordered text fragments of a streamed response body.
pub type FragmentStream = BoxStream<'static, Result<String, TransportError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Credential tier a remote operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    Read,
    Write,
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityLevel::Read => write!(f, "read"),
            SecurityLevel::Write => write!(f, "write"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    /// Path relative to the endpoint base URL.
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub security_level: SecurityLevel,
}

impl TransportRequest {
    /// A read-level POST, the shape of every answer-related call.
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            security_level: SecurityLevel::Read,
        }
    }

    pub fn with_security_level(mut self, level: SecurityLevel) -> Self {
        self.security_level = level;
        self
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("timeout")]
    Timeout,
    #[error("decode error: {0}")]
    Decode(String),
    /// The service reported a failure inside an otherwise healthy stream.
    #[error("service error: {0}")]
    Remote(String),
    #[error("no {0} credential configured")]
    MissingCredential(SecurityLevel),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a request and decode the whole body as JSON.
    async fn request(&self, request: TransportRequest)
        -> Result<serde_json::Value, TransportError>;

    /// Perform a request and expose the body as it arrives.
    async fn stream(&self, request: TransportRequest) -> Result<FragmentStream, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_defaults_to_read_level() {
        let req = TransportRequest::post("/v1/x", serde_json::json!({}));
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.security_level, SecurityLevel::Read);

        let req = req.with_security_level(SecurityLevel::Write);
        assert_eq!(req.security_level, SecurityLevel::Write);
    }

    #[test]
    fn error_display() {
        let err = TransportError::Http {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
        assert_eq!(
            TransportError::MissingCredential(SecurityLevel::Write).to_string(),
            "no write credential configured"
        );
    }
}
