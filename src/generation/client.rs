use std::time::Duration;

use reqwest::Client;

use super::error::GenerationError;
use super::types::{ChatTurn, GenerationOptions, GenerationRequest, GenerationResponse};

/// The opaque `generate(prompt, options) -> text` contract every component
/// depends on. Implemented by [`GenerationClient`] for real backends and by
/// scripted mocks in tests.
pub trait TextGenerator {
    async fn generate(
        &self,
        prompt: &[ChatTurn],
        options: GenerationOptions,
    ) -> Result<String, GenerationError>;
}

/// HTTP client for a chat-style text-generation endpoint.
pub struct GenerationClient {
    api_key: String,
    client: Client,
    endpoint: String,
}

impl GenerationClient {
    pub fn new(api_key: String, endpoint: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            client,
            endpoint,
        }
    }
}

impl TextGenerator for GenerationClient {
    async fn generate(
        &self,
        prompt: &[ChatTurn],
        options: GenerationOptions,
    ) -> Result<String, GenerationError> {
        let body = GenerationRequest {
            messages: prompt.to_vec(),
            parameters: options,
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(GenerationError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<GenerationResponse>().await?;
        Ok(body.generated_text.trim().to_string())
    }
}
