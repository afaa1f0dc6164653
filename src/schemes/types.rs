use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Name the extractor writes when it could not identify a scheme on the page.
pub const PLACEHOLDER_NAME: &str = "Information not found";

/// Sentinel for "every region" / "every category".
pub const ALL: &str = "All";
/// Sentinel for "any gender".
pub const ANY: &str = "Any";

pub const DEFAULT_MIN_AGE: i64 = 0;
pub const DEFAULT_MAX_AGE: i64 = 100;
pub const DEFAULT_MIN_INCOME: i64 = 0;
pub const DEFAULT_MAX_INCOME: i64 = 5_000_000;

const PLACEHOLDER_LINK: &str = "#";

fn default_min_age() -> Value {
    Value::from(DEFAULT_MIN_AGE)
}
fn default_max_age() -> Value {
    Value::from(DEFAULT_MAX_AGE)
}
fn default_min_income() -> Value {
    Value::from(DEFAULT_MIN_INCOME)
}
fn default_max_income() -> Value {
    Value::from(DEFAULT_MAX_INCOME)
}

/// Free text the extractor may emit as a list or a number. Lists are joined
/// with ", ", other non-strings keep their JSON text and `null` is absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    })
}

/// Filter and link fields: anything but a string counts as missing.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// One government scheme as stored in `schemes.json`.
///
/// The numeric bounds are kept as raw JSON because the file is produced by
/// an LLM and may hold `"18"`, `18`, or `"Information not found"` in the same
/// position. They are only interpreted when a profile is matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRecord {
    #[serde(rename = "scheme_name", alias = "name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        alias = "targetState",
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_state: Option<String>,
    #[serde(
        default,
        alias = "targetGender",
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_gender: Option<String>,
    #[serde(default = "default_min_age", alias = "minAge")]
    pub min_age: Value,
    #[serde(default = "default_max_age", alias = "maxAge")]
    pub max_age: Value,
    #[serde(default = "default_min_income", alias = "minIncome")]
    pub min_income: Value,
    #[serde(default = "default_max_income", alias = "maxIncome")]
    pub max_income: Value,
    #[serde(
        default,
        alias = "eligibilityCriteria",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub eligibility_criteria: Option<String>,
    #[serde(
        default,
        alias = "documentsRequired",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub documents_required: Option<String>,
    #[serde(
        default,
        alias = "applicationSteps",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub application_steps: Option<String>,
    #[serde(
        default,
        alias = "officialLink",
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub official_link: Option<String>,
    /// Keys the extractor emitted that we don't model. Kept so they survive a
    /// rewrite of the file and show up in scheme details.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SchemeRecord {
    /// Minimal record with every optional field unset and default bounds.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
            target_state: None,
            target_gender: None,
            min_age: default_min_age(),
            max_age: default_max_age(),
            min_income: default_min_income(),
            max_income: default_max_income(),
            eligibility_criteria: None,
            documents_required: None,
            application_steps: None,
            official_link: None,
            extra: Map::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME
    }

    pub fn link(&self) -> &str {
        self.official_link.as_deref().unwrap_or(PLACEHOLDER_LINK)
    }

    pub fn description_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.description.as_deref().unwrap_or(fallback)
    }

    /// Resolve the eligibility bounds, or `None` if any of them is malformed
    /// or a field the matcher needs is missing.
    pub fn eligibility(&self) -> Option<Eligibility<'_>> {
        Some(Eligibility {
            min_age: parse_bound(&self.min_age)?,
            max_age: parse_bound(&self.max_age)?,
            min_income: parse_bound(&self.min_income)?,
            max_income: parse_bound(&self.max_income)?,
            gender: self.target_gender.as_deref()?,
            state: self.target_state.as_deref()?,
            category: self.category.as_deref()?,
        })
    }
}

/// Parsed, trusted view of a record's filter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility<'a> {
    pub min_age: i64,
    pub max_age: i64,
    pub min_income: i64,
    pub max_income: i64,
    pub gender: &'a str,
    pub state: &'a str,
    pub category: &'a str,
}

/// Integer interpretation of a bound: JSON integers, floats (truncated) and
/// integer strings. Everything else is malformed.
pub fn parse_bound(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Gender selector on the profile form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    Any,
    Male,
    Female,
    Others,
}

impl Gender {
    /// Label as it appears in `target_gender`.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Any => ANY,
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "Others",
        }
    }
}

/// A form selection that is either unconstrained ("All") or a specific value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn label(&self) -> &str {
        match self {
            Choice::All => ALL,
            Choice::Only(v) => v,
        }
    }
}

/// One profile form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    pub state: Choice,
    pub income: u64,
    pub category: Choice,
}
