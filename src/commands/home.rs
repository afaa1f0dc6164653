use crate::state::Context;

const LANDING: &str = "\
# AI Civic Engagement Agent
Your personal guide to discovering and understanding Indian Government Schemes.

## Why This Project Matters
Millions of Indians miss out on government benefits because they don't know they exist or can't understand the application process. This assistant makes governance accessible, transparent, and personalized for every citizen.

It supports UN **SDG 16 (Peace, Justice & Strong Institutions)** and **SDG 11 (Sustainable Cities & Communities)**.

## Features at a Glance
- **Personalized Scheme Finder:** `/civic find` filters our database by your age, gender, state, income and interests.
- **AI Assistant Chat:** `/civic chat` answers questions in plain English or Hindi.
- **Step-by-step Guidance:** the agent explains eligibility criteria, required documents, and how to apply.
- **Auto-Updated Data:** an offline extraction agent sources scheme information from official government portals.

## How It Helps You
**Step 1 · Fill Details:** give your basic information to `/civic find`.
**Step 2 · Get Recommendations:** receive a personalized list of schemes you are eligible for.
**Step 3 · Ask & Apply:** use `/civic chat` to ask questions and get guidance on how to apply.";

/// What this assistant does and how to use it
#[poise::command(slash_command, guild_only)]
pub async fn home(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    ctx.say(LANDING).await?;
    Ok(())
}
