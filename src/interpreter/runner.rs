//! Run guard and drivers
//!
//! A [`Runner`] allows one walk at a time. Starting a run while another is in
//! progress is ignored, and so is checking a program. Cues are pulled one by
//! one with [`Runner::next_cue`] by a front-end that schedules its own pauses,
//! or [`Runner::play`] drives a whole run on the current thread.

use crate::config::Timing;
use crate::interpreter::events::{EventSink, Side};
use crate::interpreter::walker::{Cue, Mode, RunReport, StopSignal, Walker};
use crate::parser::program::Program;
use crate::validator::{self, CheckOutcome, ExpectedState};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Blocks for the length of a `Pause` cue
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

pub struct Runner {
    timing: Timing,
    stop: StopSignal,
    active: Option<Walker>,
    last: Option<RunReport>,
}

impl Runner {
    pub fn new(timing: Timing) -> Self {
        Runner {
            timing,
            stop: StopSignal::new(),
            active: None,
            last: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Side of the run in progress
    pub fn active_side(&self) -> Option<Side> {
        self.active.as_ref().map(Walker::side)
    }

    /// A handle that stops the current run when raised
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Begin an animated walk of `source`. Returns false, and changes
    /// nothing, when a run is already in progress.
    pub fn start(&mut self, source: &str, side: Side, looping: bool) -> bool {
        if self.is_busy() {
            debug!(side = side.label(), "run ignored, another run is active");
            return false;
        }
        self.stop.reset();
        self.last = None;
        self.active = Some(Walker::new(
            Program::parse(source),
            Mode::Animated { looping },
            side,
            self.timing,
            self.stop.clone(),
        ));
        true
    }

    /// Ask the active run to stop before its next line
    pub fn stop(&self) {
        if self.is_busy() {
            self.stop.raise();
        }
    }

    /// Next cue of the active run. When the run ends its report is kept for
    /// [`Runner::take_report`] and the runner becomes idle.
    pub fn next_cue(&mut self) -> Option<Cue> {
        let walker = self.active.as_mut()?;
        match walker.next_cue() {
            Some(cue) => Some(cue),
            None => {
                if let Some(walker) = self.active.take() {
                    self.last = Some(walker.into_report());
                }
                None
            }
        }
    }

    /// Report of the last finished run, once
    pub fn take_report(&mut self) -> Option<RunReport> {
        self.last.take()
    }

    /// Drive the active run to its end on this thread
    pub fn play(&mut self, sink: &mut dyn EventSink, sleeper: &mut dyn Sleeper) -> Option<RunReport> {
        while let Some(cue) = self.next_cue() {
            match cue {
                Cue::Emit(event) => sink.emit(&event),
                Cue::Pause(duration) => sleeper.sleep(duration),
            }
        }
        self.take_report()
    }

    /// Grade `source` silently; `None` while an animated run is active
    pub fn check(
        &self,
        source: &str,
        expected: &ExpectedState,
        validate_loop: Option<bool>,
    ) -> Option<CheckOutcome> {
        if self.is_busy() {
            debug!("check ignored, a run is active");
            return None;
        }
        Some(validator::check(source, expected, validate_loop))
    }
}
