mod commands;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkError, FrameworkOptions};
use tracing::{error, info, Level};

use civic_agent::agent::Agent;
use civic_agent::llm::LlmClient;
use civic_agent::schemes::SchemeStore;
use civic_agent::translate::GoogleTranslator;
use state::{AppState, SessionStore};

const APOLOGY: &str =
    "Sorry, something went wrong while answering and the assistant could not recover. Please try again in a moment.";

async fn on_error(error: FrameworkError<'_, AppState, anyhow::Error>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().qualified_name, "command failed: {:#}", error);
            if let Err(e) = ctx.say(APOLOGY).await {
                error!("failed to send apology: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let token = dotenv::var("DISCORD_TOKEN").context("DISCORD_TOKEN required")?;
    let guild_id: Option<serenity::GuildId> = dotenv::var("DISCORD_GUILD_ID")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(serenity::GuildId::new);

    // Scheme corpus: read once, on first use, for the life of the process
    let schemes_path =
        PathBuf::from(dotenv::var("SCHEMES_PATH").unwrap_or_else(|_| "schemes.json".to_string()));
    let store = Arc::new(SchemeStore::new(schemes_path.clone()));
    info!(
        path = ?schemes_path,
        count = store.schemes().len(),
        "Scheme store initialized"
    );
    if let Some(warning) = store.unavailable() {
        error!("{}", warning);
    }

    let llm_client = Arc::new(LlmClient::from_env()?);
    info!(model = llm_client.model(), "LLM client initialized");
    let translator = Arc::new(GoogleTranslator::from_env()?);

    let agent = Arc::new(Agent::new(llm_client, translator, store.clone()));

    let app_state = AppState {
        store,
        agent,
        sessions: SessionStore::default(),
    };

    let intents =
        serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MESSAGES;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::civic()],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} top-level command(s):", commands.len());
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                    for sub in &cmd.subcommands {
                        info!("    /{} {}", cmd.name, sub.name);
                    }
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        gid,
                    )
                    .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    )
                    .await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting civic agent Discord bot...");

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
