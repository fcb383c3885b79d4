//! Prompt definitions.

use std::fmt;

use crate::domain::{
    entities::answers::AnswerStore, error::DomainError, predicate::Predicate,
    value_objects::AnswerValue,
};

/// One selectable entry of a `list` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Text shown in the selection menu.
    pub label: String,
    pub value: AnswerValue,
    /// Text echoed after selection; falls back to the label.
    pub short: Option<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            short: None,
        }
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn display_short(&self) -> &str {
        self.short.as_deref().unwrap_or(&self.label)
    }
}

/// Kind of input a prompt collects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    String,
    Confirm,
    List(Vec<Choice>),
}

impl PromptKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Confirm => "confirm",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra checks applied to a resolved text answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// npm package naming rules.
    PackageName,
}

impl ValidationRule {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "package-name" => Ok(Self::PackageName),
            other => Err(DomainError::InvalidSchema(format!(
                "unknown validation rule '{other}'; expected: package-name"
            ))),
        }
    }

    fn check(self, value: &str) -> Result<(), String> {
        match self {
            Self::PackageName => check_package_name(value),
        }
    }
}

fn check_package_name(name: &str) -> Result<(), String> {
    if name.len() > 214 {
        return Err("name must be at most 214 characters".into());
    }
    if name.starts_with('.') || name.starts_with('_') {
        return Err("name cannot start with '.' or '_'".into());
    }
    if name.chars().any(char::is_whitespace) {
        return Err("name cannot contain whitespace".into());
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("name must be lowercase".into());
    }
    let url_safe = |c: char| c.is_ascii_alphanumeric() || "-._~@/".contains(c);
    if let Some(bad) = name.chars().find(|c| !url_safe(*c)) {
        return Err(format!("name cannot contain '{bad}'"));
    }
    Ok(())
}

/// A single question in the prompt schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub name: String,
    pub kind: PromptKind,
    pub message: String,
    pub default: Option<AnswerValue>,
    pub when: Predicate,
    pub required: bool,
    pub validation: Option<ValidationRule>,
}

impl Prompt {
    fn new(name: impl Into<String>, kind: PromptKind, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            message: message.into(),
            default: None,
            when: Predicate::always(),
            required: false,
            validation: None,
        }
    }

    pub fn string(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, PromptKind::String, message)
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, PromptKind::Confirm, message)
    }

    pub fn list(
        name: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self::new(name, PromptKind::List(choices), message)
    }

    pub fn when(mut self, when: Predicate) -> Self {
        self.when = when;
        self
    }

    pub fn default_value(mut self, value: impl Into<AnswerValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn validate(mut self, rule: ValidationRule) -> Self {
        self.validation = Some(rule);
        self
    }

    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            PromptKind::List(choices) => choices,
            _ => &[],
        }
    }

    /// Whether the prompt is asked given the answers so far.
    pub fn is_visible(&self, answers: &AnswerStore) -> bool {
        self.when.evaluate(answers)
    }

    /// Default used when the user supplies nothing.
    ///
    /// An explicit `default` wins; otherwise `confirm` falls back to `true`,
    /// `list` to its first choice, and `string` has none.
    pub fn fallback(&self) -> Option<AnswerValue> {
        if let Some(default) = &self.default {
            return Some(default.clone());
        }
        match &self.kind {
            PromptKind::String => None,
            PromptKind::Confirm => Some(AnswerValue::Bool(true)),
            PromptKind::List(choices) => choices.first().map(|c| c.value.clone()),
        }
    }

    /// Index of `value` in the choice list.
    pub fn choice_index(&self, value: &AnswerValue) -> Option<usize> {
        self.choices().iter().position(|c| &c.value == value)
    }

    /// Check that `value` fits this prompt and return it.
    ///
    /// # Errors
    /// - [`DomainError::TypeMismatch`] for a wrongly typed value
    /// - [`DomainError::InvalidChoice`] for an undeclared list value
    /// - [`DomainError::ValidationFailed`] when the validation rule rejects it
    pub fn accept(&self, value: AnswerValue) -> Result<AnswerValue, DomainError> {
        match (&self.kind, &value) {
            (PromptKind::String, AnswerValue::Text(text)) => {
                if let Some(rule) = self.validation {
                    rule.check(text).map_err(|reason| DomainError::ValidationFailed {
                        prompt: self.name.clone(),
                        reason,
                    })?;
                }
                Ok(value)
            }
            (PromptKind::Confirm, AnswerValue::Bool(_)) => Ok(value),
            (PromptKind::List(_), _) if self.choice_index(&value).is_some() => Ok(value),
            (PromptKind::List(_), _) => Err(DomainError::InvalidChoice {
                prompt: self.name.clone(),
                value: value.to_string(),
            }),
            (PromptKind::String, _) => Err(self.mismatch("string", &value)),
            (PromptKind::Confirm, _) => Err(self.mismatch("boolean", &value)),
        }
    }

    /// `true` if [`accept`](Self::accept) would take `value`.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        self.accept(value.clone()).is_ok()
    }

    fn mismatch(&self, expected: &'static str, value: &AnswerValue) -> DomainError {
        DomainError::TypeMismatch {
            prompt: self.name.clone(),
            expected,
            value: value.to_string(),
        }
    }

    /// Structural checks run when the schema is assembled.
    pub(crate) fn validate_definition(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidSchema("prompt name cannot be empty".into()));
        }
        if let PromptKind::List(choices) = &self.kind {
            if choices.is_empty() {
                return Err(DomainError::InvalidSchema(format!(
                    "list prompt '{}' declares no choices",
                    self.name
                )));
            }
        }
        if self.validation.is_some() && self.kind != PromptKind::String {
            return Err(DomainError::InvalidSchema(format!(
                "validation rules only apply to string prompts ('{}' is {})",
                self.name, self.kind
            )));
        }
        if let Some(default) = &self.default {
            self.accept(default.clone()).map_err(|e| {
                DomainError::InvalidSchema(format!(
                    "default for prompt '{}' is invalid: {e}",
                    self.name
                ))
            })?;
        }
        Ok(())
    }
}
