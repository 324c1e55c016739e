use crate::circuit_breaker::{create_llm_circuit_breaker, LlmCircuitBreaker};
use crate::config::LlmSettings;
use crate::generator::{GenerationError, TextGenerator};
use async_trait::async_trait;
use failsafe::futures::CircuitBreaker;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// System instruction sent with every prompt.
pub const SYSTEM_PROMPT: &str = "You are a professional marketing communication expert. Generate concise, friendly, and conversion-focused messages.";

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint
/// (OpenAI, Azure-style gateways, Ollama, vLLM, ...).
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    breaker: LlmCircuitBreaker,
}

impl OpenAiCompatibleClient {
    /// Creates a new `OpenAiCompatibleClient`.
    ///
    /// # Arguments
    ///
    /// * `settings` - Provider endpoint, credentials, model and timeout.
    pub fn new(settings: &LlmSettings) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                GenerationError::Unavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            breaker: create_llm_circuit_breaker(),
        })
    }

    /// Sends one chat completion request and returns the assistant text.
    async fn request_completion(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("Requesting completion from {} (model {})", url, self.model);

        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt},
            ],
            "temperature": 0.7,
        });

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::Http(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let data: ChatCompletionResponse = response.json().await.map_err(|e| {
            GenerationError::InvalidResponse(format!("Failed to parse completion: {}", e))
        })?;

        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match self.breaker.call(self.request_completion(prompt)).await {
            Ok(text) => Ok(text),
            Err(failsafe::Error::Inner(e)) => Err(e),
            Err(failsafe::Error::Rejected) => Err(GenerationError::CircuitOpen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenAiCompatibleClient::new(&LlmSettings {
            base_url: "https://example.com/v1/".to_string(),
            api_key: None,
            model: "test-model".to_string(),
            timeout_secs: 5,
        });
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url, "https://example.com/v1");
    }
}
