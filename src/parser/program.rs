//! A classified program: one [`Statement`] per source line
//!
//! [`Program::parse`] classifies every line and resolves the `{ ... }` block
//! of each header (`void setup()`, `void loop()`, `si (...) alors {`) by
//! counting braces from the header. Only brace lines and headers take part,
//! and braces inside `"..."` are ignored. The opening brace may end the
//! header line or sit alone on the next non-blank line.

use crate::parser::statement::{classify_line, Block, Statement};
use std::ops::Range;

/// One source line and its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The line as written, trimmed
    pub text: String,
    pub statement: Statement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    lines: Vec<Line>,
}

impl Program {
    pub fn parse(source: &str) -> Self {
        let raw: Vec<&str> = source.lines().collect();
        let classified: Vec<Statement> = raw.iter().map(|text| classify_line(text)).collect();
        let lines = raw
            .iter()
            .zip(&classified)
            .enumerate()
            .map(|(index, (text, statement))| {
                let statement = match statement.clone() {
                    Statement::SetupStart(_) => {
                        Statement::SetupStart(match_block(&raw, &classified, index))
                    }
                    Statement::LoopStart(_) => {
                        Statement::LoopStart(match_block(&raw, &classified, index))
                    }
                    Statement::ConditionalStart { condition, .. } => Statement::ConditionalStart {
                        condition,
                        block: match_block(&raw, &classified, index),
                    },
                    other => other,
                };
                Line {
                    text: text.trim().to_string(),
                    statement,
                }
            })
            .collect();
        Program { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when there is nothing but whitespace to run
    pub fn is_empty(&self) -> bool {
        self.lines
            .iter()
            .all(|line| line.statement == Statement::Blank)
    }

    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn statement(&self, index: usize) -> Option<&Statement> {
        self.lines.get(index).map(|line| &line.statement)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Lines strictly inside the first `void loop()` block
    pub fn loop_body(&self) -> Option<Range<usize>> {
        self.lines.iter().find_map(|line| match line.statement {
            Statement::LoopStart(Some(block)) => Some(body_range(block)),
            _ => None,
        })
    }

    /// Whether the loop body switches any pin, which makes the loop matter
    /// for grading
    pub fn loop_has_pin_actions(&self) -> bool {
        self.loop_body().is_some_and(|body| {
            self.lines[body]
                .iter()
                .any(|line| line.statement.is_pin_action())
        })
    }
}

/// Body lines of a block; empty when both braces share a line
pub fn body_range(block: Block) -> Range<usize> {
    block.body_start()..block.close.max(block.body_start())
}

/// Whether a line can open or close a block; statements never do, even when
/// a literal holds a brace
fn owns_braces(statement: &Statement) -> bool {
    matches!(statement, Statement::Brace(_)) || statement.opens_block()
}

/// Braces of a line outside `"..."` literals
fn structural_braces(line: &str) -> impl Iterator<Item = char> + '_ {
    let mut quoted = false;
    line.chars().filter(move |&c| {
        if c == '"' {
            quoted = !quoted;
        }
        !quoted && matches!(c, '{' | '}')
    })
}

/// Find the braces owned by the header at `header`
fn match_block(lines: &[&str], statements: &[Statement], header: usize) -> Option<Block> {
    let mut depth = 0usize;
    let mut open = None;

    for (index, line) in lines.iter().enumerate().skip(header) {
        let trimmed = line.trim();
        if open.is_none() && index > header && !trimmed.is_empty() && !trimmed.starts_with('{') {
            return None;
        }
        if index > header && !owns_braces(&statements[index]) {
            continue;
        }
        for c in structural_braces(trimmed) {
            if c == '{' {
                open.get_or_insert(index);
                depth += 1;
            } else {
                let opened = open?;
                depth -= 1;
                if depth == 0 {
                    return Some(Block {
                        open: opened,
                        close: index,
                    });
                }
            }
        }
    }
    None
}
