//! Line classifier
//!
//! Turns one source line into a [`Statement`]. The grammar is tiny and fixed,
//! so instead of a token stream every line maps to exactly one variant of a
//! closed enum. Malformed lines are variants too: whether they raise an error
//! depends on whether the walker actually executes them (lines outside
//! `setup()`/`loop()` and inside a skipped `si` block never do).
//!
//! # Recognition order
//!
//! First match wins:
//!
//! 1. empty → [`Statement::Blank`]
//! 2. contains `void setup` → [`Statement::SetupStart`]
//! 3. contains `void loop` → [`Statement::LoopStart`]
//! 4. exactly `{` or `}` → [`Statement::Brace`]
//! 5. starts with `//` → [`Statement::Comment`]
//! 6. `si (<condition>) alors {` → [`Statement::ConditionalStart`]
//! 7. no trailing `;` → [`Statement::MissingSemicolon`]
//! 8. contains `=` → typed or untyped [`Statement::Assign`]
//! 9. `pinN;` → [`Statement::PinDeclare`]
//! 10. contains `pinN_allumé` / `pinN_éteint` → [`Statement::PinOn`] / [`Statement::PinOff`]
//! 11. `pinN_word;` → [`Statement::MalformedPinCommand`]
//! 12. contains `pin` → [`Statement::UnknownPinSyntax`]
//! 13. anything else → [`Statement::InvalidStatement`]
//!
//! Keywords ignore case, identifiers and values keep it. Pin actions also
//! ignore accents, so `pin1_allume` and `PIN1_ALLUMÉ` mean the same thing.
//!
//! Block headers (rules 2, 3 and 6) need the following lines to find their
//! closing brace; [`classify_line`] leaves the block unresolved and
//! [`crate::parser::program::Program`] fills it in.

use crate::interpreter::state::VarType;

/// Line range of a `{ ... }` block: the line holding the opening brace and
/// the line holding its matching closing brace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub open: usize,
    pub close: usize,
}

impl Block {
    /// First line strictly inside the braces
    pub fn body_start(&self) -> usize {
        self.open + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brace {
    Open,
    Close,
}

/// The classified form of one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Blank,
    Comment,
    /// `void setup()`; `None` when its braces never close
    SetupStart(Option<Block>),
    /// `void loop()`; `None` when its braces never close
    LoopStart(Option<Block>),
    Brace(Brace),
    /// `si (<condition>) alors {`, condition text without the outer parentheses
    ConditionalStart {
        condition: String,
        block: Option<Block>,
    },
    /// `[type] <name> = <value>;`, value kept verbatim
    Assign {
        name: String,
        var_type: VarType,
        value: String,
    },
    /// `pinN;` with the digits as written (validated on execution)
    PinDeclare(String),
    PinOn(String),
    PinOff(String),
    MissingSemicolon,
    MalformedPinCommand,
    UnknownPinSyntax,
    InvalidStatement,
}

impl Statement {
    /// Pin on/off lines, the only statements that drive LEDs
    pub fn is_pin_action(&self) -> bool {
        matches!(self, Statement::PinOn(_) | Statement::PinOff(_))
    }

    /// Headers that own a `{ ... }` block
    pub fn opens_block(&self) -> bool {
        matches!(
            self,
            Statement::SetupStart(_) | Statement::LoopStart(_) | Statement::ConditionalStart { .. }
        )
    }
}

/// Classify a single line; block headers come back with `block: None`
pub fn classify_line(line: &str) -> Statement {
    let line = line.trim();
    let lower = line.to_ascii_lowercase();

    if line.is_empty() {
        return Statement::Blank;
    }
    if lower.contains("void setup") {
        return Statement::SetupStart(None);
    }
    if lower.contains("void loop") {
        return Statement::LoopStart(None);
    }
    match line {
        "{" => return Statement::Brace(Brace::Open),
        "}" => return Statement::Brace(Brace::Close),
        _ => {}
    }
    if line.starts_with("//") {
        return Statement::Comment;
    }
    if let Some(condition) = conditional_header(line) {
        return Statement::ConditionalStart {
            condition: condition.to_string(),
            block: None,
        };
    }

    let Some(body) = line.strip_suffix(';') else {
        return Statement::MissingSemicolon;
    };

    if line.contains('=') {
        return assignment(body).unwrap_or(Statement::InvalidStatement);
    }

    classify_pin_line(&fold(line))
}

/// Extract the condition of `si (<condition>) alors {`
fn conditional_header(line: &str) -> Option<&str> {
    let rest = strip_prefix_ci(line, "si")?;
    if !rest.starts_with(|c: char| c.is_whitespace() || c == '(') {
        return None;
    }
    let rest = rest.trim_start().strip_prefix('(')?;
    let rest = rest.strip_suffix('{')?.trim_end();
    let rest = strip_suffix_ci(rest, "alors")?.trim_end();
    let condition = rest.strip_suffix(')')?;
    Some(condition.trim())
}

/// `int vitesse = 5` or `vitesse = 5` (trailing `;` already removed)
fn assignment(body: &str) -> Option<Statement> {
    let (target, value) = body.split_once('=')?;
    let value = value.trim();
    if value.is_empty() || value.starts_with('=') {
        return None;
    }

    let mut words = target.split_whitespace();
    let (name, var_type) = match (words.next(), words.next(), words.next()) {
        (Some(keyword), Some(name), None) => (name, VarType::from_keyword(keyword)?),
        (Some(name), None, None) => (name, VarType::Untyped),
        _ => return None,
    };
    if !is_identifier(name) {
        return None;
    }

    Some(Statement::Assign {
        name: name.to_string(),
        var_type,
        value: value.to_string(),
    })
}

/// Rules 9-13, applied to a lowercased, accent-folded line ending in `;`
fn classify_pin_line(folded: &str) -> Statement {
    if let Some(digits) = folded
        .strip_prefix("pin")
        .and_then(|rest| rest.strip_suffix(';'))
    {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Statement::PinDeclare(digits.to_string());
        }
    }

    if let Some(digits) = find_pin_action(folded, "allume") {
        return Statement::PinOn(digits);
    }
    if let Some(digits) = find_pin_action(folded, "eteint") {
        return Statement::PinOff(digits);
    }

    if pin_occurrences(folded).any(|(_, rest)| is_malformed_command(rest)) {
        return Statement::MalformedPinCommand;
    }
    if folded.contains("pin") {
        return Statement::UnknownPinSyntax;
    }
    Statement::InvalidStatement
}

/// Digits of the first `pinN_<action>` in the line
fn find_pin_action(folded: &str, action: &str) -> Option<String> {
    pin_occurrences(folded).find_map(|(digits, rest)| {
        rest.strip_prefix('_')
            .filter(|after| after.starts_with(action))
            .map(|_| digits.to_string())
    })
}

/// `_word;` right after the pin number
fn is_malformed_command(rest: &str) -> bool {
    let Some(after) = rest.strip_prefix('_') else {
        return false;
    };
    let word_len = after
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(after.len());
    word_len > 0 && after[word_len..].starts_with(';')
}

/// Every `pin<digits>` in the line, with the text that follows the digits
fn pin_occurrences(folded: &str) -> impl Iterator<Item = (&str, &str)> {
    folded.match_indices("pin").filter_map(move |(at, _)| {
        let rest = &folded[at + 3..];
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        (len > 0).then(|| (&rest[..len], &rest[len..]))
    })
}

/// Lowercase and drop the accents learners are likely to type on `e`
fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' => 'e',
            other => other,
        })
        .collect()
}

/// A letter (accents welcome) or `_`, then letters, digits or `_`
pub fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn strip_suffix_ci<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    let tail = text.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &text[..split])
}
