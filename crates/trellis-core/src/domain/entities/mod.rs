pub mod answers;
pub mod blueprint;
pub mod common;
pub mod filter;
pub mod project_structure;
pub mod prompt;
pub mod schema;

pub use crate::domain::DomainError;
pub use answers::{AnswerStore, IS_NOT_TEST};
pub use blueprint::{Blueprint, RenderContext, TemplateFile};
pub use project_structure::ProjectStructure;
pub use prompt::{Choice, Prompt, PromptKind};
