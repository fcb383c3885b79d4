//! Core domain layer for Trellis.
//!
//! Pure logic only: answers, predicates, prompts, filters and the blueprint
//! aggregate. All I/O, rendering and interaction live behind the ports in
//! the application layer.
//!
//! - **No I/O**: nothing here touches the filesystem or spawns processes
//! - **Immutable entities**: a blueprint never changes once built
//! - **Parse once**: predicates and globs are validated at load time

pub mod entities;
pub mod error;
pub mod predicate;
pub mod value_objects;

pub use entities::{
    answers::{AnswerStore, IS_NOT_TEST},
    blueprint::{
        Blueprint, BlueprintBuilder, BlueprintMetadata, CompletionSettings, RenderContext,
        TemplateFile, TemplateTree,
    },
    common::{Permissions, RelativePath},
    filter::{FilterRule, FilterTable, Inclusion},
    project_structure::{FileToWrite, ProjectStructure},
    prompt::{Choice, Prompt, PromptKind, ValidationRule},
    schema::{ForwardReference, PromptSchema},
};
pub use error::{DomainError, ErrorCategory};
pub use predicate::{Expr, Predicate};
pub use value_objects::AnswerValue;
