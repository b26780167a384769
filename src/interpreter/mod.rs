//! Pin language execution
//!
//! This module provides the runtime:
//! - [`state`]: pins, variables and region of one run
//! - [`executor`]: applies a single statement to the state
//! - [`condition`]: evaluates `si` comparisons
//! - [`walker`]: sequences a whole program, animated or silent
//! - [`runner`]: one-run-at-a-time guard and drivers
//! - [`events`]: what the renderer is told
//! - [`errors`]: learner-facing error types
//!
//! # Execution Model
//!
//! The walker moves through the program one line at a time. Only the
//! `setup()` block and the `loop()` body execute. Every mistake is fatal: the
//! run stops at the offending line and reports it.

pub mod condition;
pub mod errors;
pub mod events;
pub mod executor;
pub mod runner;
pub mod state;
pub mod walker;
