use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Source code that asks the translator to detect the input language.
pub const AUTO_DETECT: &str = "auto";

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com/translate_a/single";
/// The public endpoint rejects requests much above 5k characters.
const MAX_CHUNK_CHARS: usize = 4500;

/// Output languages offered in chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    /// Model output is in English, so only other targets need translating.
    pub fn needs_translation(self) -> bool {
        self != Language::English
    }
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Client for the keyless Google translate endpoint.
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn from_env() -> Result<Self> {
        let base_url =
            dotenv::var("TRANSLATE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, base_url })
    }

    async fn translate_chunk(&self, chunk: &str, source: &str, target: &str) -> Result<String> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", chunk),
            ])
            .send()
            .await
            .context("Translation request failed")?
            .error_for_status()
            .context("Translation service returned an error")?;

        let body: Value = resp
            .json()
            .await
            .context("Failed to parse translation response")?;
        parse_response(&body)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        for chunk in chunk_text(text, MAX_CHUNK_CHARS) {
            out.push_str(&self.translate_chunk(chunk, source, target).await?);
        }
        debug!(source, target, len = out.len(), "text translated");
        Ok(out)
    }
}

/// Concatenate the translated segments of a `translate_a/single` reply:
/// `[[["translated", "original", ...], ...], ...]`.
fn parse_response(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .context("Unexpected translation response shape")?;
    Ok(segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect())
}

/// Split text into pieces of at most `max` chars, breaking after a newline
/// where possible. Pieces keep their trailing newlines so concatenating the
/// translations preserves the layout.
fn chunk_text(text: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        if remaining.chars().count() <= max {
            chunks.push(remaining);
            break;
        }
        let limit = remaining
            .char_indices()
            .nth(max)
            .map(|(i, _)| i)
            .unwrap_or(remaining.len());
        let split_at = remaining[..limit]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(limit);
        chunks.push(&remaining[..split_at]);
        remaining = &remaining[split_at..];
    }
    chunks
}
