//! Program walker: sequences statements over a whole program
//!
//! The walker owns the [`InterpreterState`] of one run and drives the
//! [`executor`](crate::interpreter::executor) line by line:
//!
//! ```text
//! Idle ──start──▶ RunningSetup ──void loop()──▶ RunningLoop ──▶ Stopped
//!                      │                             │
//!                      └──── end / error / stop ─────┴──────────▶ Stopped
//! ```
//!
//! - Only lines inside the `setup()` block or the `loop()` body execute; other
//!   lines are highlighted and passed over.
//! - A `si` header whose condition is false skips its block entirely. The
//!   skipped lines still cost a short pause in animated mode so the pacing
//!   follows the source.
//! - Any error stops the run at the offending line.
//!
//! # Modes
//!
//! Both modes share every rule above and differ only in what comes out:
//!
//! - [`Mode::Animated`] queues [`Cue`]s (events and pauses) for a renderer and
//!   may repeat the loop body until the [`StopSignal`] is raised.
//! - [`Mode::Silent`] queues nothing and walks the loop body a fixed number of
//!   times, for grading.
//!
//! # Cancellation
//!
//! The stop signal is checked before each line and before each loop
//! iteration. Cues already queued for the line in flight are still delivered.

use crate::config::Timing;
use crate::interpreter::errors::{ErrorKind, ExecutionError};
use crate::interpreter::events::{ExecutionEvent, Side};
use crate::interpreter::executor::{self, Effect, Transition};
use crate::interpreter::state::{InterpreterState, Region};
use crate::parser::program::{body_range, Program};
use crate::parser::statement::{Block, Statement};
use std::collections::VecDeque;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Shared cooperative stop flag
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One unit of animated output: show something, or wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    Emit(ExecutionEvent),
    Pause(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Timed cues for a renderer; `looping` repeats the loop body until stopped
    Animated { looping: bool },
    /// No cues; the loop body is walked `loop_passes` times
    Silent { loop_passes: usize },
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
    Failed(ExecutionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    RunningSetup,
    RunningLoop,
    Stopped(Outcome),
}

/// Final state of a run and how it ended
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub state: InterpreterState,
    pub outcome: Outcome,
}

impl RunReport {
    /// The state, or the error that stopped the run
    pub fn into_result(self) -> Result<InterpreterState, ExecutionError> {
        match self.outcome {
            Outcome::Failed(error) => Err(error),
            Outcome::Completed | Outcome::Cancelled => Ok(self.state),
        }
    }
}

/// Walks one program once; create a new walker for every run
pub struct Walker {
    program: Program,
    mode: Mode,
    side: Side,
    timing: Timing,
    stop: StopSignal,
    state: InterpreterState,
    phase: Phase,
    cursor: usize,
    setup_close: Option<usize>,
    loop_body: Range<usize>,
    passes: usize,
    pending: VecDeque<Cue>,
}

impl Walker {
    pub fn new(program: Program, mode: Mode, side: Side, timing: Timing, stop: StopSignal) -> Self {
        Walker {
            program,
            mode,
            side,
            timing,
            stop,
            state: InterpreterState::new(),
            phase: Phase::Idle,
            cursor: 0,
            setup_close: None,
            loop_body: 0..0,
            passes: 0,
            pending: VecDeque::new(),
        }
    }

    /// A grading walker: no cues, no pauses, nothing can stop it
    pub fn silent(program: Program, loop_passes: usize) -> Self {
        Self::new(
            program,
            Mode::Silent { loop_passes },
            Side::Student,
            Timing::instant(),
            StopSignal::new(),
        )
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Stopped(_)) && self.pending.is_empty()
    }

    /// Next cue of the walk, or `None` once the run has stopped and every
    /// queued cue was delivered. Silent walks return `None` on the first call.
    pub fn next_cue(&mut self) -> Option<Cue> {
        loop {
            if let Some(cue) = self.pending.pop_front() {
                return Some(cue);
            }
            match self.phase {
                Phase::Idle => self.start(),
                Phase::RunningSetup => self.advance_setup(),
                Phase::RunningLoop => self.advance_loop(),
                Phase::Stopped(_) => return None,
            }
        }
    }

    /// Drain the walk, discarding cues. Never returns for an animated walk
    /// that loops unless the stop signal is raised from elsewhere.
    pub fn run_to_end(&mut self) -> Outcome {
        while self.next_cue().is_some() {}
        match &self.phase {
            Phase::Stopped(outcome) => outcome.clone(),
            _ => Outcome::Cancelled,
        }
    }

    /// Consume the walker. A walk that has not stopped reports `Cancelled`.
    pub fn into_report(self) -> RunReport {
        let outcome = match self.phase {
            Phase::Stopped(outcome) => outcome,
            _ => Outcome::Cancelled,
        };
        RunReport {
            state: self.state,
            outcome,
        }
    }

    fn start(&mut self) {
        self.state = InterpreterState::new();
        self.cursor = 0;
        self.setup_close = None;
        self.passes = 0;

        if self.program.is_empty() {
            self.fail(0, ErrorKind::EmptyProgram);
            return;
        }
        debug!(
            side = self.side.label(),
            lines = self.program.len(),
            mode = ?self.mode,
            "run started"
        );
        self.phase = Phase::RunningSetup;
    }

    fn advance_setup(&mut self) {
        if self.cancelled() {
            return;
        }
        let index = self.cursor;
        let Some(statement) = self.program.statement(index).cloned() else {
            self.finish(Outcome::Completed);
            return;
        };

        match statement {
            Statement::Blank => self.cursor += 1,
            Statement::SetupStart(block) => {
                self.highlight(index);
                match block {
                    Some(block) => {
                        self.release(index, self.timing.short_pause());
                        self.state.set_region(Region::Setup);
                        self.setup_close = Some(block.close);
                        self.cursor += 1;
                    }
                    None => self.fail(index, ErrorKind::UnclosedBlock),
                }
            }
            Statement::LoopStart(block) => {
                self.highlight(index);
                match block {
                    Some(block) => {
                        self.release(index, self.timing.short_pause());
                        self.enter_loop(block);
                    }
                    None => self.fail(index, ErrorKind::UnclosedBlock),
                }
            }
            _ if self.state.region() != Region::Setup => {
                self.highlight(index);
                self.release(index, Duration::ZERO);
                self.cursor += 1;
            }
            statement => {
                if let Some(next) = self.run_line(index, &statement) {
                    self.cursor = next;
                }
            }
        }

        if let Some(close) = self.setup_close {
            if self.cursor > close {
                self.state.set_region(Region::None);
                self.setup_close = None;
            }
        }
    }

    fn enter_loop(&mut self, block: Block) {
        self.loop_body = body_range(block);
        self.setup_close = None;
        self.state.set_region(Region::Loop);

        let enabled = match self.mode {
            Mode::Animated { looping } => looping,
            Mode::Silent { loop_passes } => loop_passes > 0,
        };
        if enabled {
            trace!(body = ?self.loop_body, "entering loop");
            self.cursor = self.loop_body.start;
            self.passes = 0;
            self.phase = Phase::RunningLoop;
        } else {
            self.finish(Outcome::Completed);
        }
    }

    fn advance_loop(&mut self) {
        if self.cancelled() {
            return;
        }

        if self.cursor >= self.loop_body.end {
            self.passes += 1;
            trace!(pass = self.passes, "loop pass complete");
            match self.mode {
                Mode::Silent { loop_passes } if self.passes >= loop_passes => {
                    self.finish(Outcome::Completed);
                    return;
                }
                Mode::Silent { .. } => {}
                // Always queued, even when zero, so an idle loop still yields
                Mode::Animated { .. } => self
                    .pending
                    .push_back(Cue::Pause(self.timing.loop_pause())),
            }
            self.cursor = self.loop_body.start;
            return;
        }

        let index = self.cursor;
        let Some(statement) = self.program.statement(index).cloned() else {
            self.finish(Outcome::Completed);
            return;
        };
        match statement {
            Statement::Blank => {
                self.pause(self.timing.skip_pause());
                self.cursor += 1;
            }
            statement => {
                if let Some(next) = self.run_line(index, &statement) {
                    self.cursor = next;
                }
            }
        }
    }

    /// Execute one line inside a region; returns where to continue, or `None`
    /// when the run failed
    fn run_line(&mut self, index: usize, statement: &Statement) -> Option<usize> {
        trace!(side = self.side.label(), line = index, ?statement, "executing");
        self.highlight(index);

        match executor::execute(statement, &mut self.state) {
            Err(kind) => {
                self.fail(index, kind);
                None
            }
            Ok(Transition::Quiet) => {
                let pause = match statement {
                    Statement::Comment
                    | Statement::Brace(_)
                    | Statement::SetupStart(_)
                    | Statement::LoopStart(_) => self.timing.short_pause(),
                    _ => self.timing.medium_pause(),
                };
                self.release(index, pause);
                Some(index + 1)
            }
            Ok(Transition::Effect(effect)) => {
                let event = self.effect_event(effect);
                self.emit(event);
                self.release(index, self.timing.medium_pause());
                Some(index + 1)
            }
            Ok(Transition::Branch { taken, block }) => {
                self.release(index, self.timing.short_pause());
                if taken {
                    Some(index + 1)
                } else {
                    trace!(from = block.body_start(), to = block.close, "block skipped");
                    for _ in block.body_start()..=block.close {
                        self.pause(self.timing.skip_pause());
                    }
                    Some(block.close + 1)
                }
            }
        }
    }

    fn effect_event(&self, effect: Effect) -> ExecutionEvent {
        let side = self.side;
        match effect {
            Effect::LedOn(pin) => ExecutionEvent::LedOn { side, pin },
            Effect::LedOff(pin) => ExecutionEvent::LedOff { side, pin },
            Effect::VariableSet { name, display } => ExecutionEvent::VariableSet {
                side,
                name,
                display,
            },
        }
    }

    fn cancelled(&mut self) -> bool {
        if self.stop.is_raised() {
            self.finish(Outcome::Cancelled);
            return true;
        }
        false
    }

    fn fail(&mut self, line: usize, kind: ErrorKind) {
        let error = ExecutionError::new(line, kind);
        self.emit(ExecutionEvent::ErrorAtLine {
            side: self.side,
            line,
            message: error.message(),
        });
        self.finish(Outcome::Failed(error));
    }

    fn finish(&mut self, outcome: Outcome) {
        debug!(side = self.side.label(), ?outcome, "run stopped");
        self.phase = Phase::Stopped(outcome);
    }

    fn is_animated(&self) -> bool {
        matches!(self.mode, Mode::Animated { .. })
    }

    fn emit(&mut self, event: ExecutionEvent) {
        if self.is_animated() {
            self.pending.push_back(Cue::Emit(event));
        }
    }

    fn pause(&mut self, duration: Duration) {
        if self.is_animated() && !duration.is_zero() {
            self.pending.push_back(Cue::Pause(duration));
        }
    }

    fn highlight(&mut self, line: usize) {
        self.emit(ExecutionEvent::HighlightStart {
            side: self.side,
            line,
        });
        self.pause(self.timing.line_highlight());
    }

    fn release(&mut self, line: usize, pause: Duration) {
        self.pause(pause);
        self.emit(ExecutionEvent::HighlightEnd {
            side: self.side,
            line,
        });
    }
}

/// Walk `source` silently and return how it ended
pub fn run_silent(source: &str, loop_passes: usize) -> RunReport {
    let mut walker = Walker::silent(Program::parse(source), loop_passes);
    walker.run_to_end();
    walker.into_report()
}
