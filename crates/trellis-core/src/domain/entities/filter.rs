//! The file filter table: which template files survive a run.
//!
//! Inclusion policy, in full:
//!
//! - a path matched by no rule is included (default-allow);
//! - a path matched by one or more rules is included iff every matching
//!   rule's predicate is true. Declaration order never matters.

use glob::{MatchOptions, Pattern};

use crate::domain::{
    entities::answers::AnswerStore, error::DomainError, predicate::Predicate,
};

/// `**` spans directories, `*` stays within one segment.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A `(glob, predicate)` pair gating template files.
#[derive(Debug, Clone)]
pub struct FilterRule {
    glob: String,
    pattern: Pattern,
    predicate: Predicate,
}

impl FilterRule {
    /// # Errors
    /// [`DomainError::InvalidGlob`] if `glob` is not a valid pattern.
    pub fn new(glob: impl Into<String>, predicate: Predicate) -> Result<Self, DomainError> {
        let glob = glob.into();
        let pattern = Pattern::new(&glob).map_err(|e| DomainError::InvalidGlob {
            glob: glob.clone(),
            reason: e.msg.to_string(),
        })?;
        Ok(Self {
            glob,
            pattern,
            predicate,
        })
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// `path` uses `/` separators and is relative to the template root.
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, MATCH_OPTIONS)
    }
}

impl PartialEq for FilterRule {
    fn eq(&self, other: &Self) -> bool {
        self.glob == other.glob && self.predicate == other.predicate
    }
}

impl Eq for FilterRule {}

/// Outcome of filtering one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inclusion<'a> {
    /// No rule matched; included by default.
    Unfiltered,
    /// Every matching rule evaluated true.
    Included { matched: Vec<&'a FilterRule> },
    /// This rule matched and evaluated false.
    Excluded { rule: &'a FilterRule },
}

impl Inclusion<'_> {
    pub fn is_included(&self) -> bool {
        !matches!(self, Self::Excluded { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterTable {
    rules: Vec<FilterRule>,
}

impl FilterTable {
    pub fn new(rules: Vec<FilterRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decide whether `path` is emitted for `answers`.
    ///
    /// The first failing rule in declaration order is reported; the decision
    /// itself does not depend on order.
    pub fn decide<'a>(&'a self, path: &str, answers: &AnswerStore) -> Inclusion<'a> {
        let mut matched = Vec::new();
        for rule in self.rules.iter().filter(|r| r.matches(path)) {
            if !rule.predicate.evaluate(answers) {
                return Inclusion::Excluded { rule };
            }
            matched.push(rule);
        }
        if matched.is_empty() {
            Inclusion::Unfiltered
        } else {
            Inclusion::Included { matched }
        }
    }

    pub fn includes(&self, path: &str, answers: &AnswerStore) -> bool {
        self.decide(path, answers).is_included()
    }

    /// Keep the items whose path is included.
    pub fn apply<'i, T, F>(&self, items: &'i [T], path_of: F, answers: &AnswerStore) -> Vec<&'i T>
    where
        F: Fn(&T) -> &str,
    {
        items
            .iter()
            .filter(|item| self.includes(path_of(item), answers))
            .collect()
    }

    /// Rules whose glob matches none of `paths`.
    pub fn dead_rules<'p>(&self, paths: impl IntoIterator<Item = &'p str> + Clone) -> Vec<&FilterRule> {
        self.rules
            .iter()
            .filter(|rule| !paths.clone().into_iter().any(|p| rule.matches(p)))
            .collect()
    }
}
