//! Renders retrieved passages and history into model input

use super::instructions::{CITATION_RULES, PAGE_NUMBER_HINT, SYSTEM_INSTRUCTIONS};
use crate::domain::citation::UNKNOWN_PAGE_TOKEN;
use crate::domain::llm::{Message, MessageRole};
use crate::domain::retrieval::RetrievedPassage;

/// Builds the message list for one question
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_instructions: String,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self {
            system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
        }
    }
}

impl PromptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.system_instructions = instructions.into();
        self
    }

    /// `[system, ...history, user]`; system entries in the history are dropped
    pub fn assemble(
        &self,
        query: &str,
        passages: &[RetrievedPassage],
        history: &[Message],
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_instructions.clone()));
        messages.extend(
            history
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .cloned(),
        );
        messages.push(Message::user(render_question(query, passages)));
        messages
    }
}

/// One numbered context block per passage
pub fn format_context(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .enumerate()
        .map(|(i, passage)| {
            let page = passage
                .metadata
                .page
                .map_or_else(|| UNKNOWN_PAGE_TOKEN.to_string(), |p| p.to_string());
            format!(
                "[Context {}]\nSource: {}\nPage: {} {}\nContent: {}\n",
                i + 1,
                passage.metadata.source,
                page,
                PAGE_NUMBER_HINT,
                passage.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_question(query: &str, passages: &[RetrievedPassage]) -> String {
    format!(
        "CONTEXT FROM DOCUMENTS:\n{}\n\nQUESTION: {}\n\n{}",
        format_context(passages),
        query,
        CITATION_RULES
    )
}
