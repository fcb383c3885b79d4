//! Trellis Core - prompt-driven scaffolding, hexagonal style.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            trellis-cli (CLI)            │
//! │  (argument model, dialoguer front-end)  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │          Application Services           │
//! │ (GenerateService, PromptWalker, Hook)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │ (Filesystem, Renderer, Runner, Store)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     trellis-adapters (Infrastructure)   │
//! │ (manifest loader, Handlebars, process)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (answers, predicates, prompts, filters) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trellis_core::prelude::*;
//!
//! # fn demo(
//! #     blueprint: Blueprint,
//! #     renderer: Box<dyn TemplateRenderer>,
//! #     filesystem: Box<dyn Filesystem>,
//! #     frontend: impl PromptFrontend,
//! # ) -> TrellisResult<()> {
//! let service = GenerateService::new(renderer, filesystem);
//! let request = GenerateRequest::new("./my-app");
//! let outcome = service.run(&blueprint, &request, frontend)?;
//! println!("wrote {} files", outcome.written.len());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        CompletionHook, CompletionReport, GenerateRequest, GenerateService, GenerationOutcome,
        GenerationPlan, PromptWalker,
        ports::{
            BlueprintStore, CommandRunner, DependencySorter, Filesystem, PromptFrontend,
            TemplateRenderer,
        },
    };
    pub use crate::domain::{
        AnswerStore, AnswerValue, Blueprint, BlueprintMetadata, Predicate, Prompt, PromptSchema,
        RenderContext, TemplateFile,
    };
    pub use crate::error::{TrellisError, TrellisResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
