//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, cue scheduling for
//!   animated runs, exercise progress
//! - **[`panes`]**: stateless render functions for each visible pane (example
//!   and student code, boards, challenge, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the settings,
//! a course and the learner's program, then call [`App::run`].
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
