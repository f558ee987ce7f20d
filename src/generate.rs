//! Text generation provider abstraction and implementations.
//!
//! Defines the [`TextGenerator`] trait and concrete implementations:
//! - **[`DisabledGenerator`]** — returns errors; used when generation is not configured.
//! - **[`OpenAiGenerator`]** — calls the OpenAI chat completions API with retry and backoff.
//!
//! # Provider Selection
//!
//! Use [`create_generator`] to instantiate the appropriate generator based
//! on the configuration:
//!
//! ```rust,no_run
//! # use flipside::config::GenerationConfig;
//! # use flipside::generate::{create_generator, TextGenerator};
//! let config = GenerationConfig::default(); // provider = "disabled"
//! let generator = create_generator(&config).unwrap();
//! assert_eq!(generator.model_name(), "disabled");
//! ```
//!
//! # Retry Strategy
//!
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::GenerationConfig;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// A prompt-in, text-out generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model identifier (e.g. `"gpt-4o-mini"`).
    fn model_name(&self) -> &str;

    /// Generates a completion for `user` under the `system` instruction.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}

/// A no-op generator used when `generation.provider = "disabled"`.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
        bail!("Text generation is disabled. Set [generation] provider in the config.")
    }
}

/// Generator backed by the OpenAI chat completions API.
///
/// Requires the `OPENAI_API_KEY` environment variable to be set.
pub struct OpenAiGenerator {
    model: String,
    temperature: f32,
    max_retries: u32,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    /// # Errors
    ///
    /// Returns an error if `generation.model` is not set in the config
    /// or if `OPENAI_API_KEY` is not in the environment.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("generation.model required for OpenAI provider"))?;

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            model,
            temperature: config.temperature,
            max_retries: config.max_retries,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tracing::debug!(attempt, ?delay, "retrying chat completion");
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(OPENAI_CHAT_URL)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_chat_response(&json);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!(
                            "OpenAI API error {}: {}",
                            status,
                            body_text
                        ));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    bail!("OpenAI API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Generation failed after retries")))
    }
}

/// Extracts `choices[0].message.content`, trimmed.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    let content = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing message content"))?;

    let content = content.trim();
    if content.is_empty() {
        bail!("OpenAI returned an empty completion");
    }
    Ok(content.to_string())
}

/// Create a generator based on the configuration.
///
/// | `provider` | Result |
/// |------------|--------|
/// | `"disabled"` | [`DisabledGenerator`] |
/// | `"openai"` | [`OpenAiGenerator`] |
pub fn create_generator(config: &GenerationConfig) -> Result<Box<dyn TextGenerator>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledGenerator)),
        "openai" => Ok(Box::new(OpenAiGenerator::new(config)?)),
        other => bail!("Unknown generation provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_response() {
        let json = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Calm down.\n" } }]
        });
        assert_eq!(parse_chat_response(&json).unwrap(), "Calm down.");
    }

    #[test]
    fn test_parse_chat_response_missing_content() {
        let json = serde_json::json!({ "choices": [] });
        assert!(parse_chat_response(&json).is_err());
        let json = serde_json::json!({ "choices": [{ "message": { "content": "   " } }] });
        assert!(parse_chat_response(&json).is_err());
    }

    #[tokio::test]
    async fn test_disabled_generator_errors() {
        let generator = create_generator(&GenerationConfig::default()).unwrap();
        assert_eq!(generator.model_name(), "disabled");
        let err = generator.generate("sys", "user").await.unwrap_err();
        assert!(err.to_string().contains("disabled"));
    }

    #[test]
    fn test_unknown_provider() {
        let config = GenerationConfig {
            provider: "telepathy".to_string(),
            ..GenerationConfig::default()
        };
        assert!(create_generator(&config).is_err());
    }
}
