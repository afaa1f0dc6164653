mod chat;
mod find;
mod home;
mod list;

use civic_agent::schemes::types::SchemeRecord;

use crate::state::Context;

/// Discord rejects messages over 2000 chars.
const MAX_MESSAGE_CHARS: usize = 1990;

/// Civic - government scheme finder and assistant
#[poise::command(
    slash_command,
    subcommands(
        "home::home",
        "find::find",
        "chat::chat",
        "chat::history",
        "chat::clear",
        "list::all"
    )
)]
pub async fn civic(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// Send a message in Discord-safe chunks.
/// Uses ctx.say() for all chunks; poise routes follow-ups through the
/// interaction webhook, which doesn't require Send Messages channel permission.
async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    for chunk in split_message(text, MAX_MESSAGE_CHARS) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Split on a newline or space before `max` bytes where possible.
fn split_message(text: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        let mut chunk_len = remaining.len().min(max);
        while !remaining.is_char_boundary(chunk_len) {
            chunk_len -= 1;
        }
        let split_at = if chunk_len < remaining.len() {
            remaining[..chunk_len]
                .rfind('\n')
                .or_else(|| remaining[..chunk_len].rfind(' '))
                .map(|i| i + 1)
                .unwrap_or(chunk_len)
        } else {
            chunk_len
        };
        chunks.push(&remaining[..split_at]);
        remaining = &remaining[split_at..];
    }
    chunks
}

/// Link line for a scheme card; `#` means the extractor found no link.
fn link_line(record: &SchemeRecord, label: &str) -> String {
    match record.link() {
        "#" => "_No official link available._".to_string(),
        link => format!("[{}]({})", label, link),
    }
}
