use super::ChatBackend;
use crate::integration::ClientConfig;
use crate::messages::{parse_reply, ChatRequest, Reply};
use crate::{AssistantError, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, error};

/// JSON-over-HTTP backend: `POST {"message": ...}` and a reply object back
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: Url,
}

impl HttpBackend {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AssistantError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AssistantError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.request_timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn query(&self, message: &str) -> Result<Reply> {
        debug!("Posting query to {} ({} chars)", self.endpoint, message.len());

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| {
                error!("Backend request failed: {}", e);
                AssistantError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Backend returned error {}: {}", status, body);
            return Err(AssistantError::BackendStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_reply(&body).map_err(|e| {
            error!("Failed to parse backend reply: {}", e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_endpoint() {
        let result = HttpBackend::new("not a url", None);
        assert!(matches!(result, Err(AssistantError::Config(_))));
    }

    #[test]
    fn test_from_default_config() {
        let backend = HttpBackend::from_config(&ClientConfig::default()).unwrap();
        assert_eq!(backend.endpoint().as_str(), "http://localhost:8080/chat");
    }
}
