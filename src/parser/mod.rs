//! Source classifier for the pin language
//!
//! This module turns source text into a [`program::Program`]:
//! - [`statement`]: line classification (source line → [`statement::Statement`])
//! - [`program`]: per-line statements plus brace matching for block headers
//! - [`condition`]: the `<variable> <op> <literal>` syntax used by `si`
//!
//! # Grammar
//!
//! The language is line-oriented; one line holds one statement:
//! - Sections: `void setup()` and `void loop()`, each followed by a `{ ... }` block
//! - Pins: `pin1;` declares, `pin1_allumé;` / `pin1_éteint;` switch
//! - Variables: `int x = 5;`, `float`, `String`, or untyped `x = 5;`
//! - Conditionals: `si (x == 5) alors {` ... `}`
//! - Comments: lines starting with `//`
//!
//! # Classifier Implementation
//!
//! Hand-written string matching over a closed statement enum; no regex or
//! parser generator dependencies.

pub mod condition;
pub mod program;
pub mod statement;
