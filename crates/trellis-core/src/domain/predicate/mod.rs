//! Boolean predicates over the answer store.
//!
//! Predicates drive both prompt visibility (`when`) and file inclusion
//! (`filters`). They are parsed once when a blueprint is loaded and evaluated
//! by walking the syntax tree; evaluation is pure.

mod ast;
mod parser;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub use ast::Expr;

use crate::domain::{entities::answers::AnswerStore, error::DomainError, value_objects::AnswerValue};

/// A parsed predicate together with the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    source: String,
    expr: Expr,
}

impl Predicate {
    /// Parse a predicate string.
    ///
    /// # Errors
    /// [`DomainError::InvalidPredicate`] with the byte offset of the problem.
    pub fn parse(source: impl Into<String>) -> Result<Self, DomainError> {
        let source = source.into();
        let expr = parser::parse(&source)?;
        Ok(Self { source, expr })
    }

    /// A literal predicate (`when = true` / `when = false`).
    pub fn literal(value: bool) -> Self {
        Self {
            source: value.to_string(),
            expr: Expr::Literal(AnswerValue::Bool(value)),
        }
    }

    pub fn always() -> Self {
        Self::literal(true)
    }

    pub fn never() -> Self {
        Self::literal(false)
    }

    /// Evaluate against `answers`. Unknown identifiers are falsy.
    pub fn evaluate(&self, answers: &AnswerStore) -> bool {
        self.expr.is_true(answers)
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn identifiers(&self) -> BTreeSet<&str> {
        self.expr.identifiers()
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Self::always()
    }
}

impl FromStr for Predicate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
