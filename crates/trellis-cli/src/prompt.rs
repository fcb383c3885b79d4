//! Interactive terminal front-end backed by `dialoguer`.

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use tracing::trace;

use trellis_core::{
    application::{ApplicationError, ports::PromptFrontend},
    domain::{AnswerValue, Prompt, PromptKind},
    error::TrellisResult,
};

pub struct DialoguerFrontend {
    theme: ColorfulTheme,
}

impl DialoguerFrontend {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn ask_text(&self, prompt: &Prompt, default: Option<&AnswerValue>) -> dialoguer::Result<Option<AnswerValue>> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(&prompt.message)
            .allow_empty(true)
            .validate_with(|text: &String| -> Result<(), String> {
                if text.is_empty() {
                    return Ok(());
                }
                prompt
                    .accept(AnswerValue::Text(text.clone()))
                    .map(drop)
                    .map_err(|e| e.to_string())
            });
        if let Some(default) = default.and_then(AnswerValue::as_str) {
            input = input.default(default.to_string());
        }
        let text = input.interact_text()?;
        Ok((!text.is_empty()).then_some(AnswerValue::Text(text)))
    }

    fn ask_confirm(&self, prompt: &Prompt, default: Option<&AnswerValue>) -> dialoguer::Result<Option<AnswerValue>> {
        let yes = Confirm::with_theme(&self.theme)
            .with_prompt(&prompt.message)
            .default(default.and_then(AnswerValue::as_bool).unwrap_or(true))
            .interact()?;
        Ok(Some(AnswerValue::Bool(yes)))
    }

    fn ask_select(&self, prompt: &Prompt, default: Option<&AnswerValue>) -> dialoguer::Result<Option<AnswerValue>> {
        let labels: Vec<&str> = prompt.choices().iter().map(|c| c.label.as_str()).collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt(&prompt.message)
            .items(&labels)
            .default(default.and_then(|d| prompt.choice_index(d)).unwrap_or(0))
            .interact()?;
        Ok(prompt.choices().get(index).map(|c| c.value.clone()))
    }
}

impl Default for DialoguerFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptFrontend for DialoguerFrontend {
    fn ask(
        &mut self,
        prompt: &Prompt,
        default: Option<&AnswerValue>,
    ) -> TrellisResult<Option<AnswerValue>> {
        trace!(prompt = %prompt.name, kind = %prompt.kind, "asking");
        let answer = match &prompt.kind {
            PromptKind::String => self.ask_text(prompt, default),
            PromptKind::Confirm => self.ask_confirm(prompt, default),
            PromptKind::List(_) => self.ask_select(prompt, default),
        };
        answer.map_err(|e| {
            ApplicationError::PromptFailed {
                prompt: prompt.name.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
