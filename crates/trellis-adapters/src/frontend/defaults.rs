use tracing::debug;

use trellis_core::{
    application::ports::PromptFrontend,
    domain::{AnswerValue, Prompt},
    error::TrellisResult,
};

/// Answers nothing, so every visible prompt takes its default.
///
/// Used for `--yes` and when stdin is not a terminal. A required prompt with
/// no default still fails the walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsFrontend;

impl PromptFrontend for DefaultsFrontend {
    fn ask(
        &mut self,
        prompt: &Prompt,
        default: Option<&AnswerValue>,
    ) -> TrellisResult<Option<AnswerValue>> {
        debug!(prompt = %prompt.name, default = ?default, "accepting default");
        Ok(None)
    }
}
