use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, Level};

use civic_agent::llm::LlmClient;
use civic_agent::schemes::ingest::{self, HttpFetcher, TARGET_URLS};

/// Credential from `LLM_API_KEY`, or asked for on the terminal.
fn api_key() -> Result<String> {
    if let Some(key) = dotenv::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()) {
        return Ok(key);
    }
    print!("Please enter your LLM API key: ");
    std::io::stdout().flush()?;
    let mut key = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut key)
        .context("Failed to read API key")?;
    let key = key.trim().to_string();
    anyhow::ensure!(!key.is_empty(), "An API key is required");
    Ok(key)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let _ = dotenv::dotenv();
    let output =
        PathBuf::from(dotenv::var("SCHEMES_PATH").unwrap_or_else(|_| "schemes.json".to_string()));
    let delay = dotenv::var("SCRAPER_DELAY_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(5));

    let llm = LlmClient::with_api_key(Some(api_key()?))?;
    let fetcher = HttpFetcher::new()?;
    info!(model = llm.model(), urls = TARGET_URLS.len(), ?delay, "Starting extraction run");

    let records = ingest::run(&fetcher, &llm, TARGET_URLS, delay).await;

    if records.is_empty() {
        info!("No new schemes were extracted. Exiting.");
        return Ok(());
    }

    ingest::save(&output, &records)?;
    info!(count = records.len(), path = ?output, "Schemes saved");
    for (category, count) in ingest::summarize(&records) {
        info!(category, count, "  saved by category");
    }

    Ok(())
}
