use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{error::DomainError, value_objects::AnswerValue};

/// Synthetic identifier set by the generation driver: `false` while a test
/// scenario is supplying the answers, `true` for a real run.
pub const IS_NOT_TEST: &str = "isNotTest";

/// The answers collected during one generation run.
///
/// Answers are recorded once and never replaced; the store only grows while
/// the prompt schema is walked. Lookups of unknown names return `None`, which
/// predicates treat as falsy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerStore {
    answers: BTreeMap<String, AnswerValue>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used to seed a store (scenarios, tests).
    ///
    /// Later calls for the same name replace earlier ones; use [`record`]
    /// once the walk has started.
    ///
    /// [`record`]: Self::record
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.answers.insert(name.into(), value.into());
        self
    }

    /// Record a resolved answer.
    ///
    /// # Errors
    /// [`DomainError::AnswerAlreadyRecorded`] if `name` already has a value.
    pub fn record(
        &mut self,
        name: impl Into<String>,
        value: AnswerValue,
    ) -> Result<(), DomainError> {
        let name = name.into();
        if self.answers.contains_key(&name) {
            return Err(DomainError::AnswerAlreadyRecorded { name });
        }
        self.answers.insert(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&AnswerValue> {
        self.answers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.answers.contains_key(name)
    }

    /// Absent answers are falsy.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(AnswerValue::is_truthy)
    }

    /// Text value of an answer, if it is text.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AnswerValue::as_str)
    }

    /// `true` when the run was seeded by a test scenario.
    pub fn is_test_run(&self) -> bool {
        matches!(self.get(IS_NOT_TEST), Some(AnswerValue::Bool(false)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Copy every answer from `other` that is not already present.
    pub fn merge_missing(&mut self, other: &AnswerStore) {
        for (name, value) in &other.answers {
            self.answers
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

impl FromIterator<(String, AnswerValue)> for AnswerStore {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_refuses_to_overwrite() {
        let mut store = AnswerStore::new();
        store.record("lint", AnswerValue::Bool(true)).unwrap();
        let err = store.record("lint", AnswerValue::Bool(false)).unwrap_err();
        assert!(matches!(err, DomainError::AnswerAlreadyRecorded { name } if name == "lint"));
        assert_eq!(store.get("lint"), Some(&AnswerValue::Bool(true)));
    }

    #[test]
    fn missing_answers_are_falsy() {
        let store = AnswerStore::new().with("unit", true);
        assert!(store.is_truthy("unit"));
        assert!(!store.is_truthy("e2e"));
        assert_eq!(store.get("e2e"), None);
    }

    #[test]
    fn test_run_is_derived_from_is_not_test() {
        assert!(AnswerStore::new().with(IS_NOT_TEST, false).is_test_run());
        assert!(!AnswerStore::new().with(IS_NOT_TEST, true).is_test_run());
        assert!(!AnswerStore::new().is_test_run());
    }

    #[test]
    fn merge_missing_keeps_existing_values() {
        let mut store = AnswerStore::new().with("name", "kept");
        let other = AnswerStore::new().with("name", "ignored").with("lint", true);
        store.merge_missing(&other);
        assert_eq!(store.text("name"), Some("kept"));
        assert!(store.is_truthy("lint"));
    }
}
