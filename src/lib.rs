//! # Introduction
//!
//! PinQuest is a pocket microcontroller for children learning to code. A
//! learner writes a few lines in a tiny French-flavoured language (pin
//! declarations, typed variables, one-level `si (...) alors {` conditionals)
//! and watches them run line by line: LEDs light up, a variable panel fills
//! in, and the offending line turns red when something is wrong. The same
//! program is then re-run silently and graded against the exercise's
//! expected board state.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Classifier → Program → Walker ─┬─ animated: Cues → Board → TUI
//!                                         └─ silent: InterpreterState → Validator
//! ```
//!
//! 1. [`parser`]: classifies each trimmed line into a closed set of
//!    [`parser::statement::Statement`] variants and pairs every section or
//!    conditional header with its closing brace.
//! 2. [`interpreter`]: the executor applies one statement to the
//!    [`interpreter::state::InterpreterState`]; the walker sequences lines
//!    through the setup region, conditional blocks and the loop region, either
//!    animated (timed highlight and LED cues, cooperative stop) or silent.
//! 3. [`validator`]: compares a final state with an exercise's
//!    [`validator::ExpectedState`] and phrases the discrepancies for the learner.
//! 4. [`board`]: the rendering model: LEDs, variable panel and line marks
//!    for one side (example or student), fed by execution events.
//! 5. [`content`]: levels and exercises, embedded as JSON.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## The language
//!
//! ```text
//! void setup()
//! {
//!     pin1;
//!     int capteur = 0;
//!     si (capteur == 0) alors {
//!         pin1_allumé;
//!     }
//! }
//! void loop()
//! {
//!     pin1_éteint;
//! }
//! ```

pub mod board;
pub mod config;
pub mod content;
pub mod interpreter;
pub mod logging;
pub mod parser;
pub mod ui;
pub mod validator;
