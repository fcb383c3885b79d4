//! Application layer errors.
//!
//! These are orchestration failures (I/O, processes, lookups). Rule
//! violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    #[error("Blueprint not found: {name}")]
    BlueprintNotFound { name: String, available: Vec<String> },

    /// Blueprint directory or manifest could not be read or parsed.
    #[error("Failed to load blueprint from {path}: {reason}")]
    BlueprintLoad { path: PathBuf, reason: String },

    #[error("Template rendering failed for {path}: {reason}")]
    RenderingFailed { path: String, reason: String },

    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Blueprint store error")]
    StoreLockError,

    /// The interactive front-end failed or was interrupted.
    #[error("Prompt '{prompt}' failed: {reason}")]
    PromptFailed { prompt: String, reason: String },

    #[error("`{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::BlueprintNotFound { available, .. } => {
                let mut out = vec!["Try: trellis list to see available blueprints".to_string()];
                if !available.is_empty() {
                    out.push(format!("Available: {}", available.join(", ")));
                }
                out.push("Or point at a directory with --from <DIR>".into());
                out
            }
            Self::BlueprintLoad { path, .. } => vec![
                format!("Check {}", path.join("blueprint.toml").display()),
                "Run `trellis check <DIR>` for details".into(),
            ],
            Self::RenderingFailed { path, .. } => vec![
                format!("Check the Handlebars syntax in {path}"),
                "Block helpers must be closed: {{#if_or a b}}...{{/if_or}}".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec![
                "The blueprint store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::PromptFailed { .. } => vec![
                "Re-run with --yes to accept defaults".into(),
                "Or use --scenario <NAME> to supply answers".into(),
            ],
            Self::CommandFailed { command, .. } => vec![
                format!("Run `{command}` manually inside the project"),
                "Make sure the package manager is installed and on PATH".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to write into it anyway".into(),
                "Choose a different destination".into(),
            ],
            Self::RollbackFailed { path, .. } => {
                vec![format!("Remove {} manually before retrying", path.display())]
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::BlueprintNotFound { .. } => ErrorCategory::NotFound,
            Self::BlueprintLoad { .. } => ErrorCategory::Validation,
            Self::ProjectExists { .. } | Self::PromptFailed { .. } => ErrorCategory::Validation,
            Self::RenderingFailed { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. }
            | Self::RollbackFailed { .. }
            | Self::StoreLockError
            | Self::CommandFailed { .. } => ErrorCategory::Internal,
        }
    }
}
