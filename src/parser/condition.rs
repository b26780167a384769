//! Condition syntax: `<variable> <op> <literal>`

use crate::interpreter::errors::ErrorKind;
use crate::parser::statement::is_identifier;

/// Comparison operators allowed in a `si` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
        }
    }

    /// IEEE comparison, so a NaN operand is false for everything but `!=`
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Gt => left > right,
            CompareOp::Lt => left < right,
            CompareOp::Ge => left >= right,
            CompareOp::Le => left <= right,
        }
    }
}

/// A parsed single comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub variable: String,
    pub op: CompareOp,
    pub literal: String,
}

impl Condition {
    /// Parse a condition, stripping any parentheses wrapped around all of it
    pub fn parse(text: &str) -> Result<Condition, ErrorKind> {
        let mut text = text.trim();
        while let Some(inner) = unwrap_parentheses(text) {
            text = inner.trim();
        }

        let at = text
            .find(|c: char| matches!(c, '=' | '!' | '<' | '>'))
            .ok_or(ErrorKind::InvalidCondition)?;
        let rest = &text[at..];
        let (op, len) = if rest.starts_with("==") {
            (CompareOp::Eq, 2)
        } else if rest.starts_with("!=") {
            (CompareOp::Ne, 2)
        } else if rest.starts_with(">=") {
            (CompareOp::Ge, 2)
        } else if rest.starts_with("<=") {
            (CompareOp::Le, 2)
        } else if rest.starts_with('>') {
            (CompareOp::Gt, 1)
        } else if rest.starts_with('<') {
            (CompareOp::Lt, 1)
        } else {
            return Err(ErrorKind::InvalidCondition);
        };

        let variable = text[..at].trim();
        let literal = rest[len..].trim();
        if !is_identifier(variable) || !is_literal(literal) {
            return Err(ErrorKind::InvalidCondition);
        }

        Ok(Condition {
            variable: variable.to_string(),
            op,
            literal: literal.to_string(),
        })
    }
}

/// The inside of `text` when one balanced pair of parentheses encloses all
/// of it; `(a == 1) && (b == 2)` is not enclosed
fn unwrap_parentheses(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('(')?.strip_suffix(')')?;
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    (depth == 0).then_some(inner)
}

/// A single value: a quoted string, or one token free of operators
fn is_literal(text: &str) -> bool {
    if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return !inner.contains('"');
    }
    !text.is_empty()
        && !text.chars().any(|c| {
            c.is_whitespace() || matches!(c, '=' | '!' | '<' | '>' | '&' | '|' | '(' | ')')
        })
}
