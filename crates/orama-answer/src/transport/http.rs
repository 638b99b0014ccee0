//! reqwest-backed `Transport`.

use async_trait::async_trait;
use tracing::debug;

use crate::streaming::sse_fragments;

use super::config::HttpTransportConfig;
use super::{FragmentStream, SecurityLevel, Transport, TransportError, TransportRequest};

/// Longest response-body excerpt carried in an `Http` error.
const ERROR_BODY_EXCERPT: usize = 200;

pub struct HttpTransport {
    config: HttpTransportConfig,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    fn credential(&self, level: SecurityLevel) -> Result<&str, TransportError> {
        match level {
            SecurityLevel::Read => Ok(self.config.read_api_key.as_str()),
            SecurityLevel::Write => self
                .config
                .write_api_key
                .as_deref()
                .ok_or(TransportError::MissingCredential(SecurityLevel::Write)),
        }
    }

    async fn send(
        &self,
        request: &TransportRequest,
        streaming: bool,
    ) -> Result<reqwest::Response, TransportError> {
        let key = self.credential(request.security_level)?;
        let url = self.config.url_for(&request.path);

        debug!(method = ?request.method, %url, streaming, "HTTP request");

        let mut builder = self
            .http
            .request(request.method.into(), &url)
            .bearer_auth(key)
            .header("content-type", "application/json");
        if streaming {
            builder = builder.header("accept", "text/event-stream");
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::Http {
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_EXCERPT).collect(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        request: TransportRequest,
    ) -> Result<serde_json::Value, TransportError> {
        let response = self.send(&request, false).await?;
        response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn stream(&self, request: TransportRequest) -> Result<FragmentStream, TransportError> {
        let response = self.send(&request, true).await?;
        Ok(sse_fragments(response))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_credential_always_available() {
        let transport =
            HttpTransport::new(HttpTransportConfig::new("https://api.example.com", "r")).unwrap();
        assert_eq!(transport.credential(SecurityLevel::Read).unwrap(), "r");
    }

    #[test]
    fn write_credential_requires_write_key() {
        let transport =
            HttpTransport::new(HttpTransportConfig::new("https://api.example.com", "r")).unwrap();
        assert_eq!(
            transport.credential(SecurityLevel::Write).unwrap_err(),
            TransportError::MissingCredential(SecurityLevel::Write)
        );

        let transport = HttpTransport::new(
            HttpTransportConfig::new("https://api.example.com", "r").with_write_api_key("w"),
        )
        .unwrap();
        assert_eq!(transport.credential(SecurityLevel::Write).unwrap(), "w");
    }

    #[tokio::test]
    async fn write_request_without_key_fails_before_sending() {
        let transport =
            HttpTransport::new(HttpTransportConfig::new("http://127.0.0.1:9", "r")).unwrap();
        let request = TransportRequest::post("/v1/collections/x/documents", serde_json::json!({}))
            .with_security_level(SecurityLevel::Write);
        let err = transport.request(request).await.unwrap_err();
        assert_eq!(err, TransportError::MissingCredential(SecurityLevel::Write));
    }
}
