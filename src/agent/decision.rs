use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::tools::{Tool, FIND_BY_CATEGORY, GET_DETAILS};

/// Pseudo-tool the model uses to answer directly.
pub const FINAL_ANSWER: &str = "FinalAnswer";

const DEFAULT_THOUGHT: &str = "Thinking...";

/// What the decision step asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Tool(Tool),
    /// Direct answer. `None` when the model omitted `args.answer`.
    FinalAnswer(Option<String>),
    /// A tool name outside the registry.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub thought: String,
    pub action: Action,
}

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("decision is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tool `{tool}` needs a string `{arg}` argument")]
    MissingArgument {
        tool: &'static str,
        arg: &'static str,
    },
}

#[derive(Deserialize)]
struct RawDecision {
    #[serde(default)]
    thought: Option<String>,
    tool: RawTool,
}

#[derive(Deserialize)]
struct RawTool {
    name: String,
    args: Map<String, Value>,
}

/// Remove markdown code fences the model wraps around its JSON.
pub fn strip_fences(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Decode the decision step's reply.
///
/// Expected shape after fence stripping:
/// `{"thought": "...", "tool": {"name": "...", "args": {...}}}`.
pub fn decode(raw: &str) -> Result<Decision, DecisionError> {
    let parsed: RawDecision = serde_json::from_str(&strip_fences(raw))?;
    let RawTool { name, args } = parsed.tool;

    let action = match name.as_str() {
        FIND_BY_CATEGORY => Action::Tool(Tool::FindByCategory {
            category: required(&args, FIND_BY_CATEGORY, "category")?,
        }),
        GET_DETAILS => Action::Tool(Tool::GetDetails {
            scheme_name: required(&args, GET_DETAILS, "scheme_name")?,
        }),
        FINAL_ANSWER => Action::FinalAnswer(
            args.get("answer")
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        _ => Action::Unknown(name),
    };

    Ok(Decision {
        thought: parsed.thought.unwrap_or_else(|| DEFAULT_THOUGHT.to_string()),
        action,
    })
}

fn required(
    args: &Map<String, Value>,
    tool: &'static str,
    arg: &'static str,
) -> Result<String, DecisionError> {
    args.get(arg)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(DecisionError::MissingArgument { tool, arg })
}
