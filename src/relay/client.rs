//! HTTP client for the Web3Forms relay
//!
//! Posts a [`RelayPayload`] as `multipart/form-data` and reads back the
//! relay's JSON result.

use super::payload::RelayPayload;
use super::traits::{RelayClientTrait, RelayError, RelayResponse};
use crate::config::RelaySettings;
use async_trait::async_trait;

/// Public Web3Forms submission endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.web3forms.com/submit";

/// Client for the relay endpoint
pub struct Web3FormsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl Web3FormsClient {
    /// Create a client with the configured endpoint and timeout
    pub fn new(settings: &RelaySettings) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self::with_client(client, settings.endpoint.clone()))
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    pub fn with_client(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayClientTrait for Web3FormsClient {
    async fn submit(&self, payload: RelayPayload) -> Result<RelayResponse, RelayError> {
        let form = payload.into_form()?;

        tracing::info!(endpoint = %self.endpoint, "Sending submission to relay");
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        // The relay answers with its JSON result on both success and failure
        let mut result: RelayResponse =
            serde_json::from_str(&body).map_err(|source| RelayError::Decode { status, source })?;
        result.status = status;

        if result.success {
            tracing::info!(status, "Relay accepted submission");
        } else {
            tracing::warn!(status, message = %result.message, "Relay rejected submission");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeekerConfig;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> Web3FormsClient {
        Web3FormsClient::with_client(reqwest::Client::new(), format!("{}/submit", server.uri()))
    }

    fn sample_payload() -> RelayPayload {
        let mut payload = RelayPayload::new();
        payload
            .text("access_key", "test-key")
            .text("name", "Hong")
            .file("attachment", "quote_estimate.pdf", b"%PDF".to_vec());
        payload
    }

    #[test]
    fn test_new_uses_settings_endpoint() {
        let settings = SeekerConfig::default().relay_settings_with(|_| None);
        let client = Web3FormsClient::new(&settings).unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    }

    #[tokio::test]
    async fn test_posts_multipart_and_parses_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(header_exists("content-type"))
            .and(body_string_contains("name=\"access_key\""))
            .and(body_string_contains("test-key"))
            .and(body_string_contains("filename=\"quote_estimate.pdf\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Email sent successfully!"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).submit(sample_payload()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.status, 200);
        assert_eq!(response.message, "Email sent successfully!");
    }

    #[tokio::test]
    async fn test_failure_indicator_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "success": false,
                "message": "Invalid access key"
            })))
            .mount(&server)
            .await;

        let response = client_for(&server).submit(sample_payload()).await.unwrap();

        assert!(!response.success);
        assert_eq!(response.status, 400);
        assert_eq!(response.message, "Invalid access key");
    }

    #[tokio::test]
    async fn test_non_json_reply_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .submit(sample_payload())
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::Decode { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_timeout_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let relay = Web3FormsClient::with_client(client, format!("{}/submit", server.uri()));

        let err = relay.submit(sample_payload()).await.unwrap_err();
        assert!(matches!(err, RelayError::Request(_)));
    }
}
