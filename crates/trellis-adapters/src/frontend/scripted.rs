use std::collections::BTreeMap;

use trellis_core::{
    application::ports::PromptFrontend,
    domain::{AnswerValue, Prompt},
    error::TrellisResult,
};

/// Replies from a fixed map and records which prompts were asked.
///
/// Prompts without a scripted reply get `None` (their default).
#[derive(Debug, Clone, Default)]
pub struct ScriptedFrontend {
    replies: BTreeMap<String, AnswerValue>,
    asked: Vec<String>,
}

impl ScriptedFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, prompt: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.replies.insert(prompt.into(), value.into());
        self
    }

    /// Prompt names in the order they were asked.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl PromptFrontend for ScriptedFrontend {
    fn ask(
        &mut self,
        prompt: &Prompt,
        _default: Option<&AnswerValue>,
    ) -> TrellisResult<Option<AnswerValue>> {
        self.asked.push(prompt.name.clone());
        Ok(self.replies.get(&prompt.name).cloned())
    }
}
