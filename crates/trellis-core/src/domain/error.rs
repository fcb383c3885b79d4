// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel through the report types untouched)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Blueprint definition errors (raised while loading a manifest)
    // ========================================================================
    #[error("invalid predicate '{source_text}': {reason} (at offset {offset})")]
    InvalidPredicate {
        source_text: String,
        reason: String,
        offset: usize,
    },

    #[error("invalid glob '{glob}': {reason}")]
    InvalidGlob { glob: String, reason: String },

    #[error("invalid prompt schema: {0}")]
    InvalidSchema(String),

    #[error("prompt '{name}' is declared more than once")]
    DuplicatePrompt { name: String },

    #[error("invalid blueprint: {0}")]
    InvalidBlueprint(String),

    #[error("blueprint '{name}' has no template files")]
    EmptyBlueprint { name: String },

    #[error("duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Answer errors (raised while resolving prompts)
    // ========================================================================
    #[error("prompt '{prompt}' requires a value")]
    MissingRequiredAnswer { prompt: String },

    #[error("'{value}' is not one of the choices for prompt '{prompt}'")]
    InvalidChoice { prompt: String, value: String },

    #[error("prompt '{prompt}' expects a {expected} value, got '{value}'")]
    TypeMismatch {
        prompt: String,
        expected: &'static str,
        value: String,
    },

    #[error("answer for '{prompt}' rejected: {reason}")]
    ValidationFailed { prompt: String, reason: String },

    #[error("answer '{name}' has already been recorded")]
    AnswerAlreadyRecorded { name: String },

    // ========================================================================
    // Lookup errors
    // ========================================================================
    #[error("unknown scenario '{name}'")]
    UnknownScenario {
        name: String,
        available: Vec<String>,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidPredicate { source_text, .. } => vec![
                format!("Check the expression: {source_text}"),
                "Supported syntax: names, 'strings', true, false, !, &&, ||, ===, !==, ( )".into(),
            ],
            Self::InvalidGlob { glob, .. } => vec![
                format!("Check the filter pattern: {glob}"),
                "Use ** for any depth and * for a single path segment".into(),
            ],
            Self::InvalidSchema(msg) | Self::InvalidBlueprint(msg) => vec![
                "Check the blueprint.toml manifest".into(),
                format!("Details: {msg}"),
                "Run `trellis check <DIR>` to validate a blueprint".into(),
            ],
            Self::DuplicatePrompt { name } => {
                vec![format!("Rename or remove one of the '{name}' prompts")]
            }
            Self::EmptyBlueprint { name } => vec![
                format!("Blueprint '{name}' needs a template/ directory with at least one file"),
            ],
            Self::MissingRequiredAnswer { prompt } => vec![
                format!("Provide a value for '{prompt}'"),
                "Re-run interactively (without --yes) to be asked".into(),
            ],
            Self::InvalidChoice { prompt, .. } => {
                vec![format!("Pick one of the declared choices for '{prompt}'")]
            }
            Self::UnknownScenario { available, .. } => {
                let mut out = vec!["Available scenarios:".to_string()];
                out.extend(available.iter().map(|s| format!("  • {s}")));
                out
            }
            Self::ValidationFailed { reason, .. } => vec![format!("Fix the value: {reason}")],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPredicate { .. }
            | Self::InvalidGlob { .. }
            | Self::InvalidSchema(_)
            | Self::DuplicatePrompt { .. }
            | Self::InvalidBlueprint(_)
            | Self::EmptyBlueprint { .. } => ErrorCategory::Definition,
            Self::MissingRequiredAnswer { .. }
            | Self::InvalidChoice { .. }
            | Self::TypeMismatch { .. }
            | Self::ValidationFailed { .. } => ErrorCategory::Validation,
            Self::UnknownScenario { .. } => ErrorCategory::NotFound,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The blueprint itself is malformed.
    Definition,
    /// An answer was rejected.
    Validation,
    NotFound,
    Internal,
}
