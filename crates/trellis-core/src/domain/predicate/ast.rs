//! Predicate syntax tree and its interpreter.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::domain::{entities::answers::AnswerStore, value_objects::AnswerValue};

/// A parsed predicate expression.
///
/// `a !== b` is represented as `Not(Equals(a, b))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(AnswerValue),
    Identifier(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Equals(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn not(inner: Expr) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn and(lhs: Expr, rhs: Expr) -> Self {
        Self::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Expr, rhs: Expr) -> Self {
        Self::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn equals(lhs: Expr, rhs: Expr) -> Self {
        Self::Equals(Box::new(lhs), Box::new(rhs))
    }

    /// Evaluate to a boolean.
    pub fn is_true(&self, answers: &AnswerStore) -> bool {
        match self {
            Self::Literal(value) => value.is_truthy(),
            Self::Identifier(name) => answers.is_truthy(name),
            Self::Not(inner) => !inner.is_true(answers),
            Self::And(lhs, rhs) => lhs.is_true(answers) && rhs.is_true(answers),
            Self::Or(lhs, rhs) => lhs.is_true(answers) || rhs.is_true(answers),
            Self::Equals(lhs, rhs) => lhs.value(answers) == rhs.value(answers),
        }
    }

    /// Evaluate as an operand of `===`.
    ///
    /// `None` is an absent answer; it only equals another absent answer.
    fn value<'a>(&'a self, answers: &'a AnswerStore) -> Option<Cow<'a, AnswerValue>> {
        match self {
            Self::Literal(value) => Some(Cow::Borrowed(value)),
            Self::Identifier(name) => answers.get(name).map(Cow::Borrowed),
            other => Some(Cow::Owned(AnswerValue::Bool(other.is_true(answers)))),
        }
    }

    /// Every identifier referenced anywhere in the expression.
    pub fn identifiers(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Self::Literal(_) => {}
            Self::Identifier(name) => {
                out.insert(name.as_str());
            }
            Self::Not(inner) => inner.collect_identifiers(out),
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) | Self::Equals(lhs, rhs) => {
                lhs.collect_identifiers(out);
                rhs.collect_identifiers(out);
            }
        }
    }
}
