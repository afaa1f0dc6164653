use civic_agent::schemes::types::SchemeRecord;

use super::{link_line, send_chunked};
use crate::state::Context;

/// List every scheme in the knowledge base
#[poise::command(slash_command, guild_only)]
pub async fn all(
    ctx: Context<'_>,
    #[description = "Max schemes to show"] limit: Option<u32>,
) -> Result<(), anyhow::Error> {
    let store = &ctx.data().store;
    let schemes = store.schemes();

    if schemes.is_empty() {
        let mut msg = String::new();
        if let Some(warning) = store.unavailable() {
            msg.push_str(&format!("⚠️ {}\n", warning));
        }
        msg.push_str("No scheme data found. Run `scheme-scraper` to populate this list.");
        ctx.say(msg).await?;
        return Ok(());
    }

    let limit = limit.map(|l| l as usize).unwrap_or(schemes.len());
    let mut output = String::from(
        "## All Available Schemes\nA complete list of all the government schemes currently in our knowledge base.\n",
    );
    for record in schemes.iter().take(limit) {
        output.push_str(&render(record));
    }
    if limit < schemes.len() {
        output.push_str(&format!("\n_…and {} more._", schemes.len() - limit));
    }

    send_chunked(&ctx, &output).await
}

fn render(record: &SchemeRecord) -> String {
    format!(
        "\n### {}\n**Description:** {}\n{}\n",
        record.name,
        record.description_or("Information not available."),
        link_line(record, "Apply Here / Official Page ↗️"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_listing_card() {
        let mut record = SchemeRecord::named("Lakhpati Didi");
        record.description = Some("Skilling for women in self-help groups.".into());
        record.official_link = Some("https://lakhpatididi.gov.in".into());
        assert_eq!(
            render(&record),
            "\n### Lakhpati Didi\n**Description:** Skilling for women in self-help groups.\n\
             [Apply Here / Official Page ↗️](https://lakhpatididi.gov.in)\n"
        );
    }
}
