//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: program text with syntax highlighting, the executing line
//!   and the errored line
//! - [`board`]: LEDs and variable panel of one side
//! - [`challenge`]: level header, instructions, check feedback and the level popup
//! - [`status`]: status bar with keybindings and run state
//!
//! Each pane exports stateless `render_*` functions; the only state kept
//! between frames is the source panes' scroll offset.

pub mod board;
pub mod challenge;
pub mod source;
pub mod status;

pub use board::render_board_pane;
pub use challenge::{render_challenge_pane, render_header, render_popup};
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
