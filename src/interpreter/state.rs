//! Interpreter state: the board's pins, the variable bindings and the region
//!
//! One [`InterpreterState`] exists per run. It is created fresh (every pin
//! undeclared and off, no variables) when a walk starts and is owned by the
//! walker until the run ends.
//!
//! # Pin invariant
//!
//! A pin can only be switched after its declaration line has run.
//! [`InterpreterState::switch`] enforces this and reports
//! [`ErrorKind::PinNotDeclared`] instead of silently ignoring the request.

use crate::interpreter::errors::ErrorKind;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fmt;

/// The output pins wired on the simulated board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum Pin {
    #[serde(rename = "pin1")]
    Pin1,
    #[serde(rename = "pin2")]
    Pin2,
    #[serde(rename = "pin9")]
    Pin9,
    #[serde(rename = "pin10")]
    Pin10,
}

impl Pin {
    pub const ALL: [Pin; 4] = [Pin::Pin1, Pin::Pin2, Pin::Pin9, Pin::Pin10];

    /// Resolve the digits written after `pin`. `"01"` is not `"1"`.
    pub fn from_number(digits: &str) -> Option<Pin> {
        match digits {
            "1" => Some(Pin::Pin1),
            "2" => Some(Pin::Pin2),
            "9" => Some(Pin::Pin9),
            "10" => Some(Pin::Pin10),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Pin::Pin1 => 1,
            Pin::Pin2 => 2,
            Pin::Pin9 => 9,
            Pin::Pin10 => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Pin::Pin1 => "pin1",
            Pin::Pin2 => "pin2",
            Pin::Pin9 => "pin9",
            Pin::Pin10 => "pin10",
        }
    }

    /// Position in [`Pin::ALL`]
    pub fn index(self) -> usize {
        match self {
            Pin::Pin1 => 0,
            Pin::Pin2 => 1,
            Pin::Pin9 => 2,
            Pin::Pin10 => 3,
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared/lit flags of a single pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinState {
    pub declared: bool,
    pub on: bool,
}

/// Type tag written in front of an assignment, or `Untyped` when omitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    Int,
    Float,
    #[serde(alias = "String")]
    String,
    Untyped,
}

impl VarType {
    /// Parse a type keyword, ignoring case (`String` and `string` are the same)
    pub fn from_keyword(word: &str) -> Option<VarType> {
        if word.eq_ignore_ascii_case("int") {
            Some(VarType::Int)
        } else if word.eq_ignore_ascii_case("float") {
            Some(VarType::Float)
        } else if word.eq_ignore_ascii_case("string") {
            Some(VarType::String)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VarType::Int => "int",
            VarType::Float => "float",
            VarType::String => "string",
            VarType::Untyped => "sans type",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A variable binding. The value is the literal text as written; it is only
/// read as a number inside a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub value: String,
    pub var_type: VarType,
}

impl Variable {
    pub fn new(value: impl Into<String>, var_type: VarType) -> Self {
        Variable {
            value: value.into(),
            var_type,
        }
    }

    /// Text shown in the variable panel: `5 (int)`, or just `5` when untyped
    pub fn display(&self) -> String {
        match self.var_type {
            VarType::Untyped => self.value.clone(),
            typed => format!("{} ({})", self.value, typed),
        }
    }
}

/// Which section of the program the walker is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    None,
    Setup,
    Loop,
}

/// Mutable execution context for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpreterState {
    pins: [PinState; 4],
    variables: FxHashMap<String, Variable>,
    region: Region,
}

impl InterpreterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self, pin: Pin) -> PinState {
        self.pins[pin.index()]
    }

    /// All pins in board order
    pub fn pins(&self) -> impl Iterator<Item = (Pin, PinState)> + '_ {
        Pin::ALL.iter().map(move |&pin| (pin, self.pin(pin)))
    }

    pub fn declare(&mut self, pin: Pin) {
        self.pins[pin.index()].declared = true;
    }

    /// Switch a declared pin on or off
    pub fn switch(&mut self, pin: Pin, on: bool) -> Result<(), ErrorKind> {
        let state = &mut self.pins[pin.index()];
        if !state.declared {
            return Err(ErrorKind::PinNotDeclared(pin));
        }
        state.on = on;
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> &FxHashMap<String, Variable> {
        &self.variables
    }

    /// Create or overwrite a binding
    pub fn assign(&mut self, name: &str, variable: Variable) {
        self.variables.insert(name.to_string(), variable);
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_is_dark() {
        let state = InterpreterState::new();
        assert!(state.pins().all(|(_, p)| p == PinState::default()));
        assert!(state.variables().is_empty());
        assert_eq!(state.region(), Region::None);
    }

    #[test]
    fn test_switch_requires_declaration() {
        let mut state = InterpreterState::new();
        assert_eq!(
            state.switch(Pin::Pin9, true),
            Err(ErrorKind::PinNotDeclared(Pin::Pin9))
        );
        assert!(!state.pin(Pin::Pin9).on);

        state.declare(Pin::Pin9);
        state.switch(Pin::Pin9, true).unwrap();
        assert!(state.pin(Pin::Pin9).on);
        state.switch(Pin::Pin9, false).unwrap();
        assert!(!state.pin(Pin::Pin9).on);
    }

    #[test]
    fn test_pin_numbers_round_trip() {
        for pin in Pin::ALL {
            assert_eq!(Pin::from_number(&pin.number().to_string()), Some(pin));
        }
        assert_eq!(Pin::from_number("3"), None);
        assert_eq!(Pin::from_number("01"), None);
    }

    #[test]
    fn test_variable_display() {
        assert_eq!(Variable::new("5", VarType::Int).display(), "5 (int)");
        assert_eq!(Variable::new("\"salut\"", VarType::String).display(), "\"salut\" (string)");
        assert_eq!(Variable::new("3", VarType::Untyped).display(), "3");
    }

    #[test]
    fn test_type_keywords_ignore_case() {
        assert_eq!(VarType::from_keyword("String"), Some(VarType::String));
        assert_eq!(VarType::from_keyword("INT"), Some(VarType::Int));
        assert_eq!(VarType::from_keyword("double"), None);
    }
}
