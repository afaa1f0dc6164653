use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gemini's OpenAI-compatible surface; any `/chat/completions` server works.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Text in, text out. The only thing the agent and the scraper need from a model.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn from_env() -> Result<Self> {
        let api_key = dotenv::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());
        Self::with_api_key(api_key)
    }

    /// Like [`LlmClient::from_env`] but with the credential supplied by the caller.
    pub fn with_api_key(api_key: Option<String>) -> Result<Self> {
        let base_url =
            dotenv::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = dotenv::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            model,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Resolve the chat completions endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") || base.ends_with("/openai") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    /// Non-streaming chat completion.
    pub async fn chat(&self, messages: &[Message]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.3,
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req.send().await.context("LLM request failed")?;
        let status = resp.status();
        let text = resp.text().await.context("Failed to read LLM response")?;
        if !status.is_success() {
            anyhow::bail!("LLM returned {}: {}", status, text);
        }
        let json: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse LLM JSON")?;
        let content = parse_completion(&json)?;

        debug!(model = %self.model, len = content.len(), "LLM completion received");
        Ok(content)
    }
}

/// Text of `choices[0].message.content`. A null, missing or blank content
/// (e.g. a safety-blocked completion) is an error, not an empty answer.
fn parse_completion(json: &serde_json::Value) -> Result<String> {
    let content = json["choices"]
        .get(0)
        .and_then(|c| c["message"]["content"].as_str())
        .filter(|c| !c.trim().is_empty());
    match content {
        Some(content) => Ok(content.to_string()),
        None => {
            let reason = json["choices"][0]["finish_reason"]
                .as_str()
                .unwrap_or("unknown");
            anyhow::bail!("LLM returned no content (finish_reason: {})", reason)
        }
    }
}

#[async_trait]
impl TextModel for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let messages = vec![Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];
        self.chat(&messages).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> LlmClient {
        LlmClient {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }

    #[test]
    fn test_parse_completion_text() {
        let json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "PM-JAY covers you."}}]
        });
        assert_eq!(parse_completion(&json).unwrap(), "PM-JAY covers you.");
    }

    #[test]
    fn test_parse_completion_rejects_missing_content() {
        let blocked = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": null}, "finish_reason": "content_filter"}]
        });
        let err = parse_completion(&blocked).unwrap_err();
        assert!(err.to_string().contains("content_filter"));

        assert!(parse_completion(&serde_json::json!({"choices": []})).is_err());
        assert!(parse_completion(&serde_json::json!({
            "choices": [{"message": {"content": "  "}}]
        }))
        .is_err());
    }

    #[test]
    fn test_endpoint_resolution() {
        assert_eq!(
            client("http://localhost:1234/v1").endpoint(),
            "http://localhost:1234/v1/chat/completions"
        );
        assert_eq!(
            client(DEFAULT_BASE_URL).endpoint(),
            format!("{}/chat/completions", DEFAULT_BASE_URL)
        );
        assert_eq!(
            client("http://llm.internal/").endpoint(),
            "http://llm.internal/v1/chat/completions"
        );
        assert_eq!(
            client("http://x/v1/chat/completions").endpoint(),
            "http://x/v1/chat/completions"
        );
    }
}
