use civic_agent::schemes::matcher::matching;
use civic_agent::schemes::types::{Choice, Gender, SchemeRecord, UserProfile, ALL};
use civic_agent::schemes::REGIONS;
use tracing::info;

use super::{link_line, send_chunked};
use crate::state::Context;

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum GenderChoice {
    Any,
    Male,
    Female,
    Others,
}

impl From<GenderChoice> for Gender {
    fn from(choice: GenderChoice) -> Self {
        match choice {
            GenderChoice::Any => Gender::Any,
            GenderChoice::Male => Gender::Male,
            GenderChoice::Female => Gender::Female,
            GenderChoice::Others => Gender::Others,
        }
    }
}

/// Find schemes you are eligible for
#[poise::command(slash_command, guild_only)]
pub async fn find(
    ctx: Context<'_>,
    #[description = "Your age"]
    #[min = 0]
    #[max = 120]
    age: u32,
    #[description = "Annual family income (₹)"]
    #[min = 0]
    #[max = 10000000]
    income: u64,
    #[description = "Your gender (default: Any)"] gender: Option<GenderChoice>,
    #[description = "Your state (default: All)"]
    #[autocomplete = "autocomplete_state"]
    state: Option<String>,
    #[description = "Scheme category of interest (default: All)"]
    #[autocomplete = "autocomplete_category"]
    category: Option<String>,
) -> Result<(), anyhow::Error> {
    let store = &ctx.data().store;

    let Some(state) = resolve(state.as_deref(), REGIONS.iter().copied()) else {
        ctx.say("Unknown state. Pick one from the suggestions, or `All`.")
            .await?;
        return Ok(());
    };
    let categories = store.categories();
    let Some(category) = resolve(category.as_deref(), categories.iter().map(String::as_str))
    else {
        ctx.say("Unknown category. Pick one from the suggestions, or `All`.")
            .await?;
        return Ok(());
    };

    let profile = UserProfile {
        age,
        gender: gender.map(Gender::from).unwrap_or_default(),
        state,
        income,
        category,
    };
    let hits = matching(&profile, store.schemes());

    info!(
        user = ctx.author().name,
        age,
        income,
        gender = profile.gender.label(),
        state = profile.state.label(),
        category = profile.category.label(),
        count = hits.len(),
        "profile search"
    );

    let mut out = String::from("## Recommended Schemes For You\n");
    if let Some(warning) = store.unavailable() {
        out.push_str(&format!("⚠️ {}\n", warning));
    }
    if hits.is_empty() {
        out.push_str(
            "No schemes found matching your specific criteria. Please try adjusting the filters.",
        );
    } else {
        for record in hits {
            out.push_str(&render(record));
        }
    }

    send_chunked(&ctx, &out).await
}

/// Map free-text input onto one of the offered options, case-insensitively.
/// `None` input and "All" mean no constraint; unknown text is rejected.
fn resolve<'a>(input: Option<&str>, options: impl Iterator<Item = &'a str>) -> Option<Choice> {
    let Some(input) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Some(Choice::All);
    };
    if input.eq_ignore_ascii_case(ALL) {
        return Some(Choice::All);
    }
    options
        .into_iter()
        .find(|o| o.eq_ignore_ascii_case(input))
        .map(|o| Choice::Only(o.to_string()))
}

fn render(record: &SchemeRecord) -> String {
    format!(
        "\n### {}\nCategory: {} | For: {} | State: {}\n**Description:** {}\n{}\n",
        record.name,
        record.category.as_deref().unwrap_or("N/A"),
        record.target_gender.as_deref().unwrap_or("N/A"),
        record.target_state.as_deref().unwrap_or("N/A"),
        record.description_or("N/A"),
        link_line(record, "Visit Official Page"),
    )
}

async fn autocomplete_state(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    suggest(std::iter::once(ALL).chain(REGIONS.iter().copied()), partial)
}

async fn autocomplete_category(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let categories = ctx.data().store.categories();
    suggest(
        std::iter::once(ALL).chain(categories.iter().map(String::as_str)),
        partial,
    )
}

fn suggest<'a>(options: impl Iterator<Item = &'a str>, partial: &str) -> Vec<String> {
    let partial = partial.to_lowercase();
    options
        .filter(|o| o.to_lowercase().contains(&partial))
        .take(25)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_and_case() {
        let regions = || REGIONS.iter().copied();
        assert_eq!(resolve(None, regions()), Some(Choice::All));
        assert_eq!(resolve(Some("all"), regions()), Some(Choice::All));
        assert_eq!(
            resolve(Some("tamil nadu"), regions()),
            Some(Choice::Only("Tamil Nadu".into()))
        );
        assert_eq!(resolve(Some("Atlantis"), regions()), None);
    }

    #[test]
    fn test_suggest_filters_and_caps() {
        let hits = suggest(REGIONS.iter().copied(), "pradesh");
        assert!(hits.contains(&"Uttar Pradesh".to_string()));
        assert!(hits.iter().all(|h| h.contains("Pradesh")));
        assert_eq!(suggest(REGIONS.iter().copied(), "").len(), 25);
    }

    #[test]
    fn test_render_card() {
        let mut record = SchemeRecord::named("PM Fasal Bima Yojana");
        record.category = Some("Agriculture".into());
        record.target_gender = Some("Any".into());
        record.target_state = Some("All".into());
        let card = render(&record);
        assert!(card.contains("### PM Fasal Bima Yojana"));
        assert!(card.contains("Category: Agriculture | For: Any | State: All"));
        assert!(card.contains("**Description:** N/A"));
    }
}
