//! Value objects shared by prompts, predicates and the answer store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A resolved prompt value.
///
/// `confirm` prompts produce booleans, `string` prompts produce text and
/// `list` prompts produce whichever value the chosen entry declares (usually
/// text, occasionally `false` for an "opt out" entry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
}

impl AnswerValue {
    /// `false` and the empty string are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// `true` for an empty (or whitespace-only) text value.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    /// Name of the variant, used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Text(_) => "string",
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_value() {
        assert!(AnswerValue::Bool(true).is_truthy());
        assert!(!AnswerValue::Bool(false).is_truthy());
        assert!(AnswerValue::from("npm").is_truthy());
        assert!(!AnswerValue::from("").is_truthy());
    }

    #[test]
    fn blank_only_applies_to_text() {
        assert!(AnswerValue::from("   ").is_blank());
        assert!(!AnswerValue::Bool(false).is_blank());
    }

    #[test]
    fn untagged_serialisation_keeps_plain_json_shape() {
        assert_eq!(
            serde_json::to_string(&AnswerValue::from("jest")).unwrap(),
            "\"jest\""
        );
        assert_eq!(
            serde_json::to_string(&AnswerValue::Bool(false)).unwrap(),
            "false"
        );
        let parsed: AnswerValue = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, AnswerValue::Bool(true));
    }
}
