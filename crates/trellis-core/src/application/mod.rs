//! Application layer for Trellis.
//!
//! - **Services**: use cases (`GenerateService`, `PromptWalker`, `CompletionHook`)
//! - **Ports**: traits for everything outside the core
//! - **Errors**: orchestration failures
//!
//! Business rules stay in `crate::domain`; this layer only sequences them.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    CompletionHook, CompletionReport, GenerateRequest, GenerateService, GenerationOutcome,
    GenerationPlan, PromptWalker,
};

pub use ports::{
    BlueprintStore, CommandRunner, DependencySorter, Filesystem, PromptFrontend, TemplateRenderer,
};

pub use error::ApplicationError;
