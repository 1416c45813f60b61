use super::provider::SummaryProvider;
use crate::config::SummaryConfig;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::json;

/// OpenAI-compatible chat-completions provider.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiProvider {
    /// Build from config; the API key is read from the configured
    /// environment variable, never from the config file itself.
    pub fn from_config(cfg: &SummaryConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .with_context(|| format!("Missing API key environment variable {}", cfg.api_key_env))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: cfg.base_url.clone(),
            api_key,
            model: cfg.model.clone(),
            max_output_tokens: cfg.max_output_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl SummaryProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(&self, instruction: &str, transcript: &str) -> Result<String> {
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": instruction},
                {"role": "user", "content": transcript},
            ],
            "temperature": 0.3,
            "max_tokens": self.max_output_tokens,
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Summary provider request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Summary provider returned {}: {}", status, body.trim());
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Summary provider returned malformed JSON")?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        let content = content.trim().to_string();
        if content.is_empty() {
            bail!("Summary provider returned an empty completion");
        }

        Ok(content)
    }
}
