use std::collections::HashSet;

use crate::domain::{
    entities::{answers::IS_NOT_TEST, prompt::Prompt},
    error::DomainError,
};

/// The ordered prompt declarations of a blueprint.
///
/// Invariant: names are unique and every prompt passed its definition
/// checks. Declaration order is walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptSchema {
    prompts: Vec<Prompt>,
}

/// A `when` clause that names a prompt declared at or after itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardReference {
    pub prompt: String,
    pub identifier: String,
    /// `false` when the identifier is not declared anywhere.
    pub declared_later: bool,
}

impl PromptSchema {
    /// Assemble a schema, validating every prompt.
    ///
    /// # Errors
    /// [`DomainError::DuplicatePrompt`] or [`DomainError::InvalidSchema`].
    pub fn new(prompts: Vec<Prompt>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for prompt in &prompts {
            prompt.validate_definition()?;
            if !seen.insert(prompt.name.as_str()) {
                return Err(DomainError::DuplicatePrompt {
                    name: prompt.name.clone(),
                });
            }
            if prompt.name == IS_NOT_TEST {
                return Err(DomainError::InvalidSchema(format!(
                    "'{IS_NOT_TEST}' is reserved and cannot be declared as a prompt"
                )));
            }
        }
        Ok(Self { prompts })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prompt> {
        self.prompts.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prompts.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// `when` clauses that reference prompts not declared before them.
    ///
    /// Such references evaluate falsy at walk time; this is reported, never
    /// enforced.
    pub fn forward_references(&self) -> Vec<ForwardReference> {
        let mut out = Vec::new();
        for (index, prompt) in self.prompts.iter().enumerate() {
            for identifier in prompt.when.identifiers() {
                if identifier == IS_NOT_TEST {
                    continue;
                }
                let earlier = self.prompts[..index].iter().any(|p| p.name == identifier);
                if earlier {
                    continue;
                }
                out.push(ForwardReference {
                    prompt: prompt.name.clone(),
                    identifier: identifier.to_string(),
                    declared_later: self.prompts[index..].iter().any(|p| p.name == identifier),
                });
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a PromptSchema {
    type Item = &'a Prompt;
    type IntoIter = std::slice::Iter<'a, Prompt>;

    fn into_iter(self) -> Self::IntoIter {
        self.prompts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{entities::prompt::Choice, predicate::Predicate};

    fn when(source: &str) -> Predicate {
        Predicate::parse(source).unwrap()
    }

    #[test]
    fn preserves_declaration_order() {
        let schema = PromptSchema::new(vec![
            Prompt::string("name", "Name"),
            Prompt::confirm("unit", "Unit?"),
            Prompt::list("runner", "Runner", vec![Choice::new("Jest", "jest")]),
        ])
        .unwrap();
        assert_eq!(schema.names().collect::<Vec<_>>(), ["name", "unit", "runner"]);
        assert!(schema.get("runner").is_some());
        assert!(schema.get("e2e").is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = PromptSchema::new(vec![
            Prompt::confirm("lint", "Lint?"),
            Prompt::confirm("lint", "Lint again?"),
        ])
        .unwrap_err();
        assert_eq!(err, DomainError::DuplicatePrompt { name: "lint".into() });
    }

    #[test]
    fn rejects_reserved_name() {
        assert!(PromptSchema::new(vec![Prompt::confirm(IS_NOT_TEST, "?")]).is_err());
    }

    #[test]
    fn reports_forward_and_undeclared_references() {
        let schema = PromptSchema::new(vec![
            Prompt::confirm("lint", "Lint?").when(when("isNotTest && storybook")),
            Prompt::confirm("storybook", "Storybook?"),
            Prompt::confirm("unit", "Unit?").when(when("lint && typo")),
        ])
        .unwrap();

        let refs = schema.forward_references();
        assert_eq!(
            refs,
            vec![
                ForwardReference {
                    prompt: "lint".into(),
                    identifier: "storybook".into(),
                    declared_later: true,
                },
                ForwardReference {
                    prompt: "unit".into(),
                    identifier: "typo".into(),
                    declared_later: false,
                },
            ]
        );
    }

    #[test]
    fn self_reference_counts_as_forward() {
        let schema =
            PromptSchema::new(vec![Prompt::confirm("lint", "Lint?").when(when("!lint"))]).unwrap();
        assert_eq!(schema.forward_references().len(), 1);
    }
}
