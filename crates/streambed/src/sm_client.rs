//! Stream manager API client.
//!
//! The stream manager load-balances stream requests across edge servers;
//! this client asks it which edge should serve a subscription. The
//! response must be JSON carrying a `serverAddress` field; anything else
//! is an error, logged here and propagated to the caller.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Request timeout for stream manager calls in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum length for error body in error messages.
const MAX_ERROR_BODY_LEN: usize = 256;

/// Derive the stream manager base URL from a host.
///
/// Secure deployments are reached on the default https port; insecure
/// ones on the media server's plain HTTP port 5080.
#[must_use]
pub fn base_url_for_host(host: &str, secure: bool) -> String {
    if secure {
        format!("https://{host}")
    } else {
        format!("http://{host}:5080")
    }
}

/// Truncate an error response body for inclusion in error messages.
fn truncate_error_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", body.get(..end).unwrap_or_default())
}

/// Stream manager client errors.
#[derive(Debug, Error)]
pub enum SmClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("stream manager request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("unexpected content type from stream manager: {0}")]
    UnexpectedContentType(String),

    #[error("could not parse stream manager response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Response from the subscribe action.
#[derive(Debug, Clone, Deserialize)]
struct EdgeResponse {
    /// Address of the edge server assigned to serve the stream.
    #[serde(rename = "serverAddress")]
    server_address: String,
}

/// Client for the stream manager REST API.
pub struct SmClient {
    base_url: String,
    http_client: Client,
}

impl SmClient {
    /// Create a new stream manager client.
    ///
    /// # Errors
    ///
    /// Returns `SmClientError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SmClientError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            http_client,
        })
    }

    /// The subscribe-action URL for a stream.
    #[must_use]
    pub fn subscribe_url(&self, app: &str, stream_name: &str) -> String {
        format!(
            "{}/streammanager/api/1.0/event/{}/{}?action=subscribe",
            self.base_url, app, stream_name
        )
    }

    /// Ask the stream manager which edge server should serve the stream.
    ///
    /// # Errors
    ///
    /// - `SmClientError::Http` - network failure or timeout
    /// - `SmClientError::RequestFailed` - non-success status
    /// - `SmClientError::UnexpectedContentType` - response is not JSON
    /// - `SmClientError::Json` - body does not carry `serverAddress`
    pub async fn resolve_edge(
        &self,
        app: &str,
        stream_name: &str,
    ) -> Result<String, SmClientError> {
        let url = self.subscribe_url(app, stream_name);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            error!(
                target: "streambed.sm_client",
                error = %e,
                url = %url,
                "Could not request edge address from stream manager"
            );
            SmClientError::Http(e)
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                target: "streambed.sm_client",
                status = status.as_u16(),
                "Stream manager rejected edge request"
            );
            return Err(SmClientError::RequestFailed {
                status: status.as_u16(),
                body: truncate_error_body(&body),
            });
        }

        // Case-insensitive substring match; charset suffixes are common.
        if !content_type.contains("application/json") {
            error!(
                target: "streambed.sm_client",
                content_type = %content_type,
                "Could not properly parse stream manager response"
            );
            return Err(SmClientError::UnexpectedContentType(content_type));
        }

        let body = response.text().await?;
        let edge: EdgeResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                target: "streambed.sm_client",
                error = %e,
                "Could not parse stream manager response body"
            );
            SmClientError::Json(e)
        })?;

        info!(
            target: "streambed.sm_client",
            server_address = %edge.server_address,
            stream = %stream_name,
            "Resolved edge server"
        );
        Ok(edge.server_address)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_insecure_uses_port_5080() {
        assert_eq!(
            base_url_for_host("sm.example.com", false),
            "http://sm.example.com:5080"
        );
    }

    #[test]
    fn test_base_url_secure_uses_https() {
        assert_eq!(
            base_url_for_host("sm.example.com", true),
            "https://sm.example.com"
        );
    }

    #[test]
    fn test_subscribe_url_shape() {
        let client = SmClient::new("http://sm.example.com:5080").expect("client");
        assert_eq!(
            client.subscribe_url("live", "mystream"),
            "http://sm.example.com:5080/streammanager/api/1.0/event/live/mystream?action=subscribe"
        );
    }

    #[test]
    fn test_truncate_short_body_unchanged() {
        let body = r#"{"errorMessage": "No origin serving stream"}"#;
        assert_eq!(truncate_error_body(body), body);
    }

    #[test]
    fn test_truncate_long_body() {
        let body = "a".repeat(500);
        let truncated = truncate_error_body(&body);

        assert!(truncated.ends_with("...[truncated]"));
        assert!(truncated.len() <= MAX_ERROR_BODY_LEN + 15);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "ü".repeat(300);
        let truncated = truncate_error_body(&body);

        assert!(truncated.ends_with("...[truncated]"));
    }

    #[test]
    fn test_edge_response_deserializes_wire_field() {
        let json = r#"{"serverAddress": "10.0.0.7", "scope": "live"}"#;
        let response: EdgeResponse = serde_json::from_str(json).expect("response should parse");
        assert_eq!(response.server_address, "10.0.0.7");
    }
}
