//! Driving (input) port: where answers come from.

use crate::domain::{AnswerValue, Prompt};
use crate::error::TrellisResult;

/// Supplies a value for a visible prompt.
///
/// Implemented by:
/// - `trellis_cli::prompt::DialoguerFrontend` (interactive terminal)
/// - `trellis_adapters::frontend::DefaultsFrontend` (`--yes`, non-TTY)
/// - `trellis_adapters::frontend::ScriptedFrontend` (tests)
pub trait PromptFrontend {
    /// Ask `prompt`, presenting `default` when there is one.
    ///
    /// `Ok(None)` means the user supplied nothing; the walker then applies
    /// the default or reports a missing required answer. List front-ends must
    /// only ever return one of the declared choice values.
    fn ask(
        &mut self,
        prompt: &Prompt,
        default: Option<&AnswerValue>,
    ) -> TrellisResult<Option<AnswerValue>>;
}

impl<F: PromptFrontend + ?Sized> PromptFrontend for &mut F {
    fn ask(
        &mut self,
        prompt: &Prompt,
        default: Option<&AnswerValue>,
    ) -> TrellisResult<Option<AnswerValue>> {
        (**self).ask(prompt, default)
    }
}
