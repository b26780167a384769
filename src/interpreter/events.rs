//! Execution events consumed by the rendering side

use crate::interpreter::state::Pin;

/// Which code panel a run belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The exercise's demonstration program
    Example,
    /// The learner's own program
    Student,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Example => "example",
            Side::Student => "student",
        }
    }
}

/// Something the renderer should show. Events are fire-and-forget: once
/// emitted they are not retracted, even if the run is stopped right after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    HighlightStart {
        side: Side,
        line: usize,
    },
    HighlightEnd {
        side: Side,
        line: usize,
    },
    LedOn {
        side: Side,
        pin: Pin,
    },
    LedOff {
        side: Side,
        pin: Pin,
    },
    VariableSet {
        side: Side,
        name: String,
        display: String,
    },
    ErrorAtLine {
        side: Side,
        line: usize,
        message: String,
    },
}

impl ExecutionEvent {
    pub fn side(&self) -> Side {
        match self {
            ExecutionEvent::HighlightStart { side, .. }
            | ExecutionEvent::HighlightEnd { side, .. }
            | ExecutionEvent::LedOn { side, .. }
            | ExecutionEvent::LedOff { side, .. }
            | ExecutionEvent::VariableSet { side, .. }
            | ExecutionEvent::ErrorAtLine { side, .. } => *side,
        }
    }
}

/// Receiver of execution events
pub trait EventSink {
    fn emit(&mut self, event: &ExecutionEvent);
}

impl EventSink for Vec<ExecutionEvent> {
    fn emit(&mut self, event: &ExecutionEvent) {
        self.push(event.clone());
    }
}
