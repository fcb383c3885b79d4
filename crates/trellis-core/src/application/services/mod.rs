pub mod completion;
pub mod generate_service;
pub mod prompt_walker;

pub use completion::{
    CompletionHook, CompletionReport, PackageManager, Step, StepOutcome, StepReport,
};
pub use generate_service::{
    FileDecision, GenerateRequest, GenerateService, GenerationOutcome, GenerationPlan, Verdict,
};
pub use prompt_walker::PromptWalker;
