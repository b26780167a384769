//! Single-statement execution
//!
//! [`execute`] is the one state transition of the interpreter: it applies a
//! classified statement to the [`InterpreterState`] and reports what the
//! walker should do next. It knows nothing about line order, regions or
//! timing; sequencing belongs to [`crate::interpreter::walker`].
//!
//! Assignments store the right-hand side verbatim. Nothing is computed at
//! assignment time; numbers are only read inside conditions.

use crate::interpreter::condition;
use crate::interpreter::errors::ErrorKind;
use crate::interpreter::state::{InterpreterState, Pin, Variable};
use crate::parser::statement::{Block, Statement};

/// A visible side effect of one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LedOn(Pin),
    LedOff(Pin),
    VariableSet { name: String, display: String },
}

/// What executing a statement produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// State may have changed but there is nothing to show
    Quiet,
    Effect(Effect),
    /// A `si` header was evaluated; `taken` tells whether its block runs
    Branch { taken: bool, block: Block },
}

/// Apply one statement to the state
pub fn execute(statement: &Statement, state: &mut InterpreterState) -> Result<Transition, ErrorKind> {
    match statement {
        Statement::Blank
        | Statement::Comment
        | Statement::Brace(_)
        | Statement::SetupStart(_)
        | Statement::LoopStart(_) => Ok(Transition::Quiet),

        Statement::PinDeclare(number) => {
            state.declare(resolve_pin(number)?);
            Ok(Transition::Quiet)
        }
        Statement::PinOn(number) => {
            let pin = resolve_pin(number)?;
            state.switch(pin, true)?;
            Ok(Transition::Effect(Effect::LedOn(pin)))
        }
        Statement::PinOff(number) => {
            let pin = resolve_pin(number)?;
            state.switch(pin, false)?;
            Ok(Transition::Effect(Effect::LedOff(pin)))
        }

        Statement::Assign {
            name,
            var_type,
            value,
        } => {
            let variable = Variable::new(value.as_str(), *var_type);
            let display = variable.display();
            state.assign(name, variable);
            Ok(Transition::Effect(Effect::VariableSet {
                name: name.clone(),
                display,
            }))
        }

        Statement::ConditionalStart { condition, block } => {
            let block = block.ok_or(ErrorKind::UnclosedBlock)?;
            let taken = condition::evaluate(condition, state)?;
            Ok(Transition::Branch { taken, block })
        }

        Statement::MissingSemicolon => Err(ErrorKind::MissingSemicolon),
        Statement::MalformedPinCommand => Err(ErrorKind::MalformedPinCommand),
        Statement::UnknownPinSyntax => Err(ErrorKind::UnknownPinSyntax),
        Statement::InvalidStatement => Err(ErrorKind::InvalidStatement),
    }
}

fn resolve_pin(number: &str) -> Result<Pin, ErrorKind> {
    Pin::from_number(number).ok_or_else(|| ErrorKind::UnknownPin(number.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::state::VarType;
    use crate::parser::statement::classify_line;

    fn run(lines: &[&str]) -> (InterpreterState, Vec<Result<Transition, ErrorKind>>) {
        let mut state = InterpreterState::new();
        let results = lines
            .iter()
            .map(|line| execute(&classify_line(line), &mut state))
            .collect();
        (state, results)
    }

    #[test]
    fn test_declare_then_switch() {
        let (state, results) = run(&["pin1;", "pin1_allumé;"]);
        assert_eq!(results[0], Ok(Transition::Quiet));
        assert_eq!(results[1], Ok(Transition::Effect(Effect::LedOn(Pin::Pin1))));
        assert!(state.pin(Pin::Pin1).declared);
        assert!(state.pin(Pin::Pin1).on);
    }

    #[test]
    fn test_switch_before_declare_fails() {
        let (state, results) = run(&["pin2_allumé;"]);
        assert_eq!(results[0], Err(ErrorKind::PinNotDeclared(Pin::Pin2)));
        assert!(!state.pin(Pin::Pin2).on);
    }

    #[test]
    fn test_unknown_pins() {
        let (_, results) = run(&["pin3;", "pin4_allumé;", "pin99_éteint;"]);
        assert_eq!(results[0], Err(ErrorKind::UnknownPin("3".to_string())));
        assert_eq!(results[1], Err(ErrorKind::UnknownPin("4".to_string())));
        assert_eq!(results[2], Err(ErrorKind::UnknownPin("99".to_string())));
    }

    #[test]
    fn test_assignment_stores_raw_text() {
        let (state, results) = run(&["int vitesse = 2 + 3;", "vitesse = 07;"]);
        assert_eq!(
            results[0],
            Ok(Transition::Effect(Effect::VariableSet {
                name: "vitesse".to_string(),
                display: "2 + 3 (int)".to_string(),
            }))
        );
        let variable = state.variable("vitesse").unwrap();
        assert_eq!(variable.value, "07");
        assert_eq!(variable.var_type, VarType::Untyped);
    }

    #[test]
    fn test_branch() {
        let (_, results) = run(&["int mode = 5;", "si (mode == 1) alors {"]);
        // classify_line alone leaves the block unresolved
        assert_eq!(results[1], Err(ErrorKind::UnclosedBlock));

        let mut state = InterpreterState::new();
        execute(&classify_line("int mode = 5;"), &mut state).unwrap();
        let header = Statement::ConditionalStart {
            condition: "mode == 5".to_string(),
            block: Some(Block { open: 1, close: 3 }),
        };
        assert_eq!(
            execute(&header, &mut state),
            Ok(Transition::Branch {
                taken: true,
                block: Block { open: 1, close: 3 },
            })
        );
    }

    #[test]
    fn test_rejected_lines_map_to_errors() {
        let (_, results) = run(&["pin1", "pin1_on;", "pin 1;", "bonjour;"]);
        assert_eq!(results[0], Err(ErrorKind::MissingSemicolon));
        assert_eq!(results[1], Err(ErrorKind::MalformedPinCommand));
        assert_eq!(results[2], Err(ErrorKind::UnknownPinSyntax));
        assert_eq!(results[3], Err(ErrorKind::InvalidStatement));
    }

    #[test]
    fn test_markers_are_quiet() {
        let (state, results) = run(&["void setup()", "{", "// note", "}", ""]);
        assert!(results.iter().all(|r| r == &Ok(Transition::Quiet)));
        assert_eq!(state, InterpreterState::new());
    }
}
