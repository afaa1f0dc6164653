use civic_agent::agent::AgentReply;
use civic_agent::translate::Language;
use tracing::info;

use super::send_chunked;
use crate::state::{AgentTurn, Context};

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum LanguageChoice {
    #[name = "English"]
    English,
    #[name = "हिंदी (Hindi)"]
    Hindi,
}

impl From<LanguageChoice> for Language {
    fn from(choice: LanguageChoice) -> Self {
        match choice {
            LanguageChoice::English => Language::English,
            LanguageChoice::Hindi => Language::Hindi,
        }
    }
}

/// Ask the assistant about government schemes
#[poise::command(slash_command, guild_only)]
pub async fn chat(
    ctx: Context<'_>,
    #[description = "Your question"] question: String,
    #[description = "Reply language (default: English)"] language: Option<LanguageChoice>,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let language = language.map(Language::from).unwrap_or_default();
    let session = ctx.data().sessions.session(ctx.author().id.get()).await;
    let mut session = session.lock().await;

    info!(
        user = ctx.author().name,
        question,
        language = language.code(),
        "chat turn started"
    );

    let reply = ctx.data().agent.respond(&question, language).await?;
    session.record(&question, language, &reply.text);

    info!(
        answer_len = reply.text.len(),
        fallback = reply.warning.is_some(),
        turns = session.transcript.len(),
        "chat turn complete"
    );

    send_chunked(&ctx, &render_reply(&reply)).await
}

/// Show your conversation so far
#[poise::command(slash_command, guild_only)]
pub async fn history(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let session = ctx.data().sessions.session(ctx.author().id.get()).await;
    let session = session.lock().await;

    if session.transcript.is_empty() {
        ctx.say("No messages yet. Use `/civic chat` to ask something.")
            .await?;
        return Ok(());
    }

    let out = session
        .transcript
        .iter()
        .map(render_turn)
        .collect::<Vec<_>>()
        .join("\n");
    send_chunked(&ctx, &out).await
}

/// Clear your conversation
#[poise::command(slash_command, guild_only)]
pub async fn clear(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    ctx.data().sessions.reset(ctx.author().id.get()).await;
    ctx.say("Session cleared.").await?;
    Ok(())
}

fn render_reply(reply: &AgentReply) -> String {
    let mut out = String::new();
    if let Some(warning) = &reply.warning {
        out.push_str(&format!("⚠️ {}\n\n", warning));
    }
    if let Some(thought) = &reply.thought {
        out.push_str(&format!("> Agent reasoning: {}\n\n", thought));
    }
    out.push_str(&reply.text);
    out
}

fn render_turn(turn: &AgentTurn) -> String {
    format!(
        "**You** ({}, {}): {}\n**Assistant:** {}\n",
        turn.asked_at.format("%H:%M UTC"),
        turn.language.code(),
        turn.query,
        turn.reply
    )
}
