//! HTTP transport configuration.

use std::fmt;
use std::time::Duration;

/// Endpoint, credentials and timeouts for `HttpTransport`.
#[derive(Clone)]
pub struct HttpTransportConfig {
    pub base_url: String,
    pub read_api_key: String,
    pub write_api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl fmt::Debug for HttpTransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransportConfig")
            .field("base_url", &self.base_url)
            .field("read_api_key", &"[REDACTED]")
            .field(
                "write_api_key",
                &self.write_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl HttpTransportConfig {
    pub fn new(base_url: impl Into<String>, read_api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            read_api_key: read_api_key.into(),
            write_api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_write_api_key(mut self, key: impl Into<String>) -> Self {
        self.write_api_key = Some(key.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Join the base URL and a request path with exactly one slash.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
