//! Tokenizer and recursive-descent parser for predicate strings.
//!
//! ```text
//! expr    := or
//! or      := and ( "||" and )*
//! and     := compare ( "&&" compare )*
//! compare := unary ( ("===" | "!==" | "==" | "!=") unary )?
//! unary   := "!" unary | primary
//! primary := IDENT | STRING | "true" | "false" | "(" expr ")"
//! ```

use std::fmt;

use super::ast::Expr;
use crate::domain::{error::DomainError, value_objects::AnswerValue};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Identifier(String),
    Text(String),
    True,
    False,
    Not,
    And,
    Or,
    Equal,
    NotEqual,
    ParenOpen,
    ParenClose,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
            Self::Text(s) => write!(f, "string '{s}'"),
            Self::True => write!(f, "'true'"),
            Self::False => write!(f, "'false'"),
            Self::Not => write!(f, "'!'"),
            Self::And => write!(f, "'&&'"),
            Self::Or => write!(f, "'||'"),
            Self::Equal => write!(f, "'==='"),
            Self::NotEqual => write!(f, "'!=='"),
            Self::ParenOpen => write!(f, "'('"),
            Self::ParenClose => write!(f, "')'"),
        }
    }
}

/// A token plus its byte offset in the source.
type Spanned = (Token, usize);

/// Parse `source` into an [`Expr`].
pub(crate) fn parse(source: &str) -> Result<Expr, DomainError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let expr = parser.or()?;
    if let Some((token, offset)) = parser.tokens.get(parser.pos) {
        return Err(parser.error(format!("unexpected {token}"), *offset));
    }
    Ok(expr)
}

fn tokenize(source: &str) -> Result<Vec<Spanned>, DomainError> {
    let error = |reason: String, offset: usize| DomainError::InvalidPredicate {
        source_text: source.to_owned(),
        reason,
        offset,
    };

    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '(' => Token::ParenOpen,
            ')' => Token::ParenClose,
            '&' => match chars.next() {
                Some((_, '&')) => Token::And,
                _ => return Err(error("expected '&&'".into(), start)),
            },
            '|' => match chars.next() {
                Some((_, '|')) => Token::Or,
                _ => return Err(error("expected '||'".into(), start)),
            },
            '!' => {
                if chars.next_if(|(_, c)| *c == '=').is_some() {
                    chars.next_if(|(_, c)| *c == '=');
                    Token::NotEqual
                } else {
                    Token::Not
                }
            }
            '=' => {
                if chars.next_if(|(_, c)| *c == '=').is_none() {
                    return Err(error("assignment is not supported; use '==='".into(), start));
                }
                chars.next_if(|(_, c)| *c == '=');
                Token::Equal
            }
            quote @ ('\'' | '"') => {
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\\')) => match chars.next() {
                            Some((_, escaped)) => text.push(escaped),
                            None => return Err(error("unterminated string".into(), start)),
                        },
                        Some((_, c)) if c == quote => break,
                        Some((_, c)) => text.push(c),
                        None => return Err(error("unterminated string".into(), start)),
                    }
                }
                Token::Text(text)
            }
            c if is_identifier_start(c) => {
                let mut name = String::from(c);
                while let Some((_, c)) = chars.next_if(|(_, c)| is_identifier_continue(*c)) {
                    name.push(c);
                }
                match name.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    _ => Token::Identifier(name),
                }
            }
            other => return Err(error(format!("unexpected character '{other}'"), start)),
        };
        tokens.push((token, start));
    }

    Ok(tokens)
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: String, offset: usize) -> DomainError {
        DomainError::InvalidPredicate {
            source_text: self.source.to_owned(),
            reason,
            offset,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance_if(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Expr, DomainError> {
        let mut lhs = self.and()?;
        while self.advance_if(&Token::Or) {
            let rhs = self.and()?;
            lhs = Expr::or(lhs, rhs);
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, DomainError> {
        let mut lhs = self.compare()?;
        while self.advance_if(&Token::And) {
            let rhs = self.compare()?;
            lhs = Expr::and(lhs, rhs);
        }
        Ok(lhs)
    }

    fn compare(&mut self) -> Result<Expr, DomainError> {
        let lhs = self.unary()?;
        if self.advance_if(&Token::Equal) {
            let rhs = self.unary()?;
            return Ok(Expr::equals(lhs, rhs));
        }
        if self.advance_if(&Token::NotEqual) {
            let rhs = self.unary()?;
            return Ok(Expr::not(Expr::equals(lhs, rhs)));
        }
        Ok(lhs)
    }

    /// `!` binds tighter than equality: `!a === 'x'` is `(!a) === 'x'`.
    fn unary(&mut self) -> Result<Expr, DomainError> {
        if self.advance_if(&Token::Not) {
            return Ok(Expr::not(self.unary()?));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, DomainError> {
        let Some((token, offset)) = self.tokens.get(self.pos).cloned() else {
            return Err(self.error("unexpected end of expression".into(), self.source.len()));
        };
        self.pos += 1;

        match token {
            Token::Identifier(name) => Ok(Expr::Identifier(name)),
            Token::Text(text) => Ok(Expr::Literal(AnswerValue::Text(text))),
            Token::True => Ok(Expr::Literal(AnswerValue::Bool(true))),
            Token::False => Ok(Expr::Literal(AnswerValue::Bool(false))),
            Token::ParenOpen => {
                let inner = self.or()?;
                if !self.advance_if(&Token::ParenClose) {
                    let at = self
                        .tokens
                        .get(self.pos)
                        .map_or(self.source.len(), |(_, offset)| *offset);
                    return Err(self.error("expected ')'".into(), at));
                }
                Ok(inner)
            }
            other => Err(self.error(format!("unexpected {other}"), offset)),
        }
    }
}
