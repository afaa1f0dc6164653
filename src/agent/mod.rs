pub mod decision;
pub mod prompts;
pub mod tools;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::llm::TextModel;
use crate::schemes::SchemeStore;
use crate::translate::{Language, Translator, AUTO_DETECT};

use decision::Action;

const FINAL_ANSWER_FALLBACK: &str = "I hope this information was helpful!";

/// Outcome of one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    /// Answer shown to the user, already in the requested language.
    pub text: String,
    /// The model's stated reasoning for its tool choice, if it got that far.
    pub thought: Option<String>,
    /// Set when the tool path failed and the reply came from the direct fallback.
    pub warning: Option<String>,
}

/// Single-shot tool-calling agent over the scheme corpus.
///
/// One decision call, at most one tool, at most one synthesis call and at
/// most one translation. Turns are independent: no transcript is sent back
/// to the model.
pub struct Agent {
    llm: Arc<dyn TextModel>,
    translator: Arc<dyn Translator>,
    store: Arc<SchemeStore>,
}

impl Agent {
    pub fn new(
        llm: Arc<dyn TextModel>,
        translator: Arc<dyn Translator>,
        store: Arc<SchemeStore>,
    ) -> Self {
        Self {
            llm,
            translator,
            store,
        }
    }

    /// Answer `query` in `language`.
    ///
    /// Any failure on the tool path is reported as a warning and answered by
    /// one direct model call instead. If that direct call (or its
    /// translation) fails too, the error is returned to the caller.
    pub async fn respond(&self, query: &str, language: Language) -> Result<AgentReply> {
        let mut thought = None;
        match self.run_tool_path(query, language, &mut thought).await {
            Ok(text) => Ok(AgentReply {
                text,
                thought,
                warning: None,
            }),
            Err(e) => {
                warn!("agent tool path failed, falling back to direct answer: {:#}", e);
                let warning = format!(
                    "An agent error occurred: {:#}. Falling back to a direct answer.",
                    e
                );
                let direct = self.llm.generate(&prompts::fallback_prompt(query)).await?;
                let text = self.localize(direct, language).await?;
                Ok(AgentReply {
                    text,
                    thought,
                    warning: Some(warning),
                })
            }
        }
    }

    async fn run_tool_path(
        &self,
        query: &str,
        language: Language,
        thought: &mut Option<String>,
    ) -> Result<String> {
        let today = chrono::Local::now().format("%B %-d, %Y").to_string();
        let raw = self
            .llm
            .generate(&prompts::decision_prompt(query, &today))
            .await?;
        let decision = decision::decode(&raw)?;
        *thought = Some(decision.thought);

        let observation = match decision.action {
            Action::FinalAnswer(answer) => {
                info!("decision: final answer");
                let answer = answer.unwrap_or_else(|| FINAL_ANSWER_FALLBACK.to_string());
                return self.localize(answer, language).await;
            }
            Action::Tool(tool) => {
                info!(tool = tool.name(), "decision: tool call");
                tool.run(self.store.schemes())
            }
            Action::Unknown(name) => {
                warn!(tool = %name, "decision named an unknown tool");
                format!("Unknown tool: {}", name)
            }
        };

        debug!(len = observation.len(), "synthesizing answer from observation");
        let answer = self
            .llm
            .generate(&prompts::synthesis_prompt(query, &observation))
            .await?;
        self.localize(answer, language).await
    }

    async fn localize(&self, text: String, language: Language) -> Result<String> {
        if !language.needs_translation() {
            return Ok(text);
        }
        debug!(target = language.code(), "translating reply");
        self.translator
            .translate(&text, AUTO_DETECT, language.code())
            .await
    }
}
