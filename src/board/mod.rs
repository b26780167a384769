//! Rendering model for one code panel and its simulated board

use crate::interpreter::events::{EventSink, ExecutionEvent, Side};
use crate::interpreter::state::Pin;

/// An error mark attached to a source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line: usize,
    pub message: String,
}

/// What one side shows: LEDs, the variable panel and line marks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    side: Side,
    leds: [bool; 4],
    variables: Vec<(String, String)>, // (name, display) in first-assignment order
    highlighted: Option<usize>,
    error: Option<LineError>,
}

impl Board {
    pub fn new(side: Side) -> Self {
        Board {
            side,
            leds: [false; 4],
            variables: Vec::new(),
            highlighted: None,
            error: None,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Back to a dark board with no marks
    pub fn reset(&mut self) {
        *self = Board::new(self.side);
    }

    pub fn led(&self, pin: Pin) -> bool {
        self.leds[pin.index()]
    }

    /// Pins in board order with their LED state
    pub fn leds(&self) -> impl Iterator<Item = (Pin, bool)> + '_ {
        Pin::ALL.iter().map(move |&pin| (pin, self.led(pin)))
    }

    pub fn variables(&self) -> &[(String, String)] {
        &self.variables
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn error(&self) -> Option<&LineError> {
        self.error.as_ref()
    }

    /// Apply an event addressed to this side; events for the other side are ignored
    pub fn apply(&mut self, event: &ExecutionEvent) {
        if event.side() != self.side {
            return;
        }
        match event {
            ExecutionEvent::HighlightStart { line, .. } => self.highlighted = Some(*line),
            ExecutionEvent::HighlightEnd { line, .. } => {
                if self.highlighted == Some(*line) {
                    self.highlighted = None;
                }
            }
            ExecutionEvent::LedOn { pin, .. } => self.leds[pin.index()] = true,
            ExecutionEvent::LedOff { pin, .. } => self.leds[pin.index()] = false,
            ExecutionEvent::VariableSet { name, display, .. } => {
                match self.variables.iter_mut().find(|(n, _)| n == name) {
                    Some((_, shown)) => shown.clone_from(display),
                    None => self.variables.push((name.clone(), display.clone())),
                }
            }
            ExecutionEvent::ErrorAtLine { line, message, .. } => {
                self.highlighted = None;
                self.error = Some(LineError {
                    line: *line,
                    message: message.clone(),
                });
            }
        }
    }
}

impl EventSink for Board {
    fn emit(&mut self, event: &ExecutionEvent) {
        self.apply(event);
    }
}
