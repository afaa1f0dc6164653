use tracing::debug;

use crate::schemes::types::SchemeRecord;

pub const FIND_BY_CATEGORY: &str = "find_schemes_by_category";
pub const GET_DETAILS: &str = "get_scheme_details";

/// A lookup the decision step can ask for, with its typed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    FindByCategory { category: String },
    GetDetails { scheme_name: String },
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::FindByCategory { .. } => FIND_BY_CATEGORY,
            Tool::GetDetails { .. } => GET_DETAILS,
        }
    }

    /// Run the lookup and return its observation text. Never fails: a miss
    /// is reported in the text.
    pub fn run(&self, schemes: &[SchemeRecord]) -> String {
        debug!(tool = self.name(), "running tool");
        match self {
            Tool::FindByCategory { category } => find_by_category(schemes, category),
            Tool::GetDetails { scheme_name } => get_details(schemes, scheme_name),
        }
    }
}

/// Names of all schemes whose category contains `category`, case-insensitively.
pub fn find_by_category(schemes: &[SchemeRecord], category: &str) -> String {
    let needle = category.to_lowercase();
    let names: Vec<&str> = schemes
        .iter()
        .filter(|s| {
            s.category
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(&needle)
        })
        .map(|s| s.name.as_str())
        .collect();

    if names.is_empty() {
        format!("No schemes found for the category: {}", category)
    } else {
        format!("Found schemes for {}: {}", category, names.join(", "))
    }
}

/// Full JSON of the first scheme whose name contains `scheme_name`,
/// case-insensitively.
pub fn get_details(schemes: &[SchemeRecord], scheme_name: &str) -> String {
    let needle = scheme_name.to_lowercase();
    schemes
        .iter()
        .find(|s| s.name.to_lowercase().contains(&needle))
        .and_then(|s| serde_json::to_string(s).ok())
        .unwrap_or_else(|| {
            format!(
                "Could not find details for a scheme named '{}'.",
                scheme_name
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn corpus() -> Vec<SchemeRecord> {
        let mut ayushman = SchemeRecord::named("Ayushman Bharat Scheme");
        ayushman.category = Some("Health & Wellness".into());
        ayushman.official_link = Some("https://pmjay.gov.in".into());

        let mut fasal = SchemeRecord::named("PM Fasal Bima Yojana");
        fasal.category = Some("Agriculture".into());

        let mut jan = SchemeRecord::named("Jan Aushadhi");
        jan.category = Some("Public Health".into());

        vec![ayushman, fasal, jan]
    }

    #[test]
    fn test_find_by_category_case_insensitive_substring() {
        let out = find_by_category(&corpus(), "health");
        assert_eq!(
            out,
            "Found schemes for health: Ayushman Bharat Scheme, Jan Aushadhi"
        );
    }

    #[test]
    fn test_find_by_category_none() {
        let out = find_by_category(&corpus(), "Housing");
        assert_eq!(out, "No schemes found for the category: Housing");
    }

    #[test]
    fn test_get_details_returns_record_json() {
        let out = get_details(&corpus(), "Ayushman");
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["scheme_name"], json!("Ayushman Bharat Scheme"));
        assert_eq!(parsed["official_link"], json!("https://pmjay.gov.in"));
    }

    #[test]
    fn test_get_details_first_match_wins() {
        let out = get_details(&corpus(), "yojana");
        assert!(out.contains("PM Fasal Bima Yojana"));
    }

    #[test]
    fn test_get_details_not_found() {
        let out = get_details(&corpus(), "Nonexistent");
        assert_eq!(
            out,
            "Could not find details for a scheme named 'Nonexistent'."
        );
    }

    #[test]
    fn test_tool_dispatch() {
        let tool = Tool::FindByCategory {
            category: "agri".into(),
        };
        assert_eq!(tool.name(), FIND_BY_CATEGORY);
        assert!(tool.run(&corpus()).contains("PM Fasal Bima Yojana"));
    }
}
