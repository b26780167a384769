//! Grading against an exercise's expected board
//!
//! An [`ExpectedState`] names the pins and variables an exercise cares about;
//! anything it does not name is ignored. [`validate`] compares a final
//! [`InterpreterState`] with it and lists every discrepancy in the order the
//! expectation was written (pins first, then variables), phrased for the
//! learner. [`check`] runs a program silently first, so an execution error
//! always takes precedence over state discrepancies.

use crate::interpreter::errors::{ErrorKind, ExecutionError};
use crate::interpreter::state::{InterpreterState, Pin, VarType};
use crate::interpreter::walker::Walker;
use crate::parser::program::Program;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;
use tracing::info;

/// What a pin should look like; `None` fields are not checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PinExpectation {
    pub declared: Option<bool>,
    pub on: Option<bool>,
}

impl PinExpectation {
    /// Declared, and lit or dark
    pub fn declared(on: bool) -> Self {
        PinExpectation {
            declared: Some(true),
            on: Some(on),
        }
    }
}

/// Expected value text and, optionally, type of a variable
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawVariableExpectation")]
pub struct VariableExpectation {
    pub value: String,
    pub var_type: Option<VarType>,
}

impl VariableExpectation {
    pub fn value(value: impl Into<String>) -> Self {
        VariableExpectation {
            value: value.into(),
            var_type: None,
        }
    }

    pub fn typed(value: impl Into<String>, var_type: VarType) -> Self {
        VariableExpectation {
            value: value.into(),
            var_type: Some(var_type),
        }
    }
}

/// `"x": "5"` or `"x": { "value": "5", "type": "int" }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawVariableExpectation {
    Value(String),
    Full {
        value: String,
        #[serde(rename = "type", default)]
        var_type: Option<VarType>,
    },
}

impl From<RawVariableExpectation> for VariableExpectation {
    fn from(raw: RawVariableExpectation) -> Self {
        match raw {
            RawVariableExpectation::Value(value) => VariableExpectation::value(value),
            RawVariableExpectation::Full { value, var_type } => VariableExpectation { value, var_type },
        }
    }
}

/// The authored target of an exercise, in authoring order
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExpectedState {
    #[serde(default, deserialize_with = "ordered_map")]
    pub pins: Vec<(Pin, PinExpectation)>,
    #[serde(default, deserialize_with = "ordered_map")]
    pub variables: Vec<(String, VariableExpectation)>,
}

impl ExpectedState {
    pub fn with_pin(mut self, pin: Pin, expectation: PinExpectation) -> Self {
        self.pins.push((pin, expectation));
        self
    }

    pub fn with_variable(mut self, name: &str, expectation: VariableExpectation) -> Self {
        self.variables.push((name.to_string(), expectation));
        self
    }
}

/// A JSON object read as a list of entries, keeping document order
fn ordered_map<'de, D, K, V>(deserializer: D) -> Result<Vec<(K, V)>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    struct OrderedVisitor<K, V>(PhantomData<(K, V)>);

    impl<'de, K, V> Visitor<'de> for OrderedVisitor<K, V>
    where
        K: Deserialize<'de>,
        V: Deserialize<'de>,
    {
        type Value = Vec<(K, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(PhantomData))
}

/// Result of comparing a state with an expectation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub success: bool,
    pub errors: Vec<String>,
}

pub fn validate(state: &InterpreterState, expected: &ExpectedState) -> Verdict {
    let mut errors = Vec::new();

    for (pin, expectation) in &expected.pins {
        let actual = state.pin(*pin);
        if expectation.declared == Some(true) && !actual.declared {
            errors.push(format!("{pin} n'est pas déclaré"));
        }
        match expectation.on {
            Some(true) if !actual.on => errors.push(format!("{pin} devrait être allumé")),
            Some(false) if actual.on => errors.push(format!("{pin} ne devrait pas être allumé")),
            _ => {}
        }
    }

    for (name, expectation) in &expected.variables {
        let Some(actual) = state.variable(name) else {
            errors.push(format!("La variable \"{name}\" est manquante"));
            continue;
        };
        if actual.value != expectation.value {
            errors.push(format!(
                "La variable \"{name}\" devrait valoir {}",
                expectation.value
            ));
        }
        if let Some(var_type) = expectation.var_type {
            if actual.var_type != var_type {
                errors.push(format!("La variable \"{name}\" devrait être de type {var_type}"));
            }
        }
    }

    Verdict {
        success: errors.is_empty(),
        errors,
    }
}

/// How grading a program went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    /// Ran to the end but the board is wrong
    Failed(Vec<String>),
    /// Stopped on an error before it could be graded
    ExecutionFailed(ExecutionError),
}

/// Title and text shown to the learner after a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub title: String,
    pub text: String,
}

/// What the lifecycle needs to know once a check is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCompleted {
    pub success: bool,
    pub errors: Vec<String>,
    /// The exercise passed was the last one of its level
    pub last_exercise: bool,
}

impl CheckOutcome {
    pub fn success(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }

    pub fn errors(&self) -> Vec<String> {
        match self {
            CheckOutcome::Passed => Vec::new(),
            CheckOutcome::Failed(errors) => errors.clone(),
            CheckOutcome::ExecutionFailed(error) => vec![describe(error)],
        }
    }

    pub fn feedback(&self) -> Feedback {
        let (title, text) = match self {
            CheckOutcome::Passed => (
                "Parfait !",
                "Excellent travail ! Ton programme fait exactement ce qui était demandé.".to_string(),
            ),
            CheckOutcome::Failed(errors) => (
                "Pas tout à fait...",
                format!("Problèmes détectés : {}", errors.join(" • ")),
            ),
            CheckOutcome::ExecutionFailed(error) => ("Erreur détectée", describe(error)),
        };
        Feedback {
            title: title.to_string(),
            text,
        }
    }

    pub fn completed(&self, last_exercise: bool) -> RunCompleted {
        let success = self.success();
        RunCompleted {
            success,
            errors: self.errors(),
            last_exercise: success && last_exercise,
        }
    }
}

fn describe(error: &ExecutionError) -> String {
    match error.kind {
        ErrorKind::EmptyProgram => error.kind.to_string(),
        _ => format!("Ligne {}: {}", error.line + 1, error.message()),
    }
}

/// Run `source` silently and grade the final board.
///
/// `validate_loop` decides whether the `loop()` body is walked once before
/// grading. When `None`, it is walked only if it switches a pin.
pub fn check(source: &str, expected: &ExpectedState, validate_loop: Option<bool>) -> CheckOutcome {
    let program = Program::parse(source);
    let walk_loop = validate_loop.unwrap_or_else(|| program.loop_has_pin_actions());

    let mut walker = Walker::silent(program, usize::from(walk_loop));
    walker.run_to_end();
    let state = match walker.into_report().into_result() {
        Ok(state) => state,
        Err(error) => {
            info!(line = error.line, error = %error, "check stopped on an execution error");
            return CheckOutcome::ExecutionFailed(error);
        }
    };

    let verdict = validate(&state, expected);
    info!(success = verdict.success, errors = verdict.errors.len(), "check graded");
    if verdict.success {
        CheckOutcome::Passed
    } else {
        CheckOutcome::Failed(verdict.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::state::Variable;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_keeps_document_order() {
        let expected: ExpectedState = serde_json::from_str(
            r#"{
                "pins": { "pin10": { "declared": true }, "pin1": { "on": false } },
                "variables": { "z": { "value": "3", "type": "int" }, "a": "1" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            expected,
            ExpectedState::default()
                .with_pin(
                    Pin::Pin10,
                    PinExpectation {
                        declared: Some(true),
                        on: None
                    }
                )
                .with_pin(
                    Pin::Pin1,
                    PinExpectation {
                        declared: None,
                        on: Some(false)
                    }
                )
                .with_variable("z", VariableExpectation::typed("3", VarType::Int))
                .with_variable("a", VariableExpectation::value("1"))
        );
    }

    #[test]
    fn test_type_names_accept_capitalised_string() {
        let expected: ExpectedState =
            serde_json::from_str(r#"{ "variables": { "nom": { "value": "\"Léa\"", "type": "String" } } }"#)
                .unwrap();
        assert_eq!(expected.variables[0].1.var_type, Some(VarType::String));
    }

    #[test]
    fn test_validate_lists_errors_in_expectation_order() {
        let mut state = InterpreterState::new();
        state.declare(Pin::Pin2);
        state.switch(Pin::Pin2, true).unwrap();
        state.assign("rouge", Variable::new("10", VarType::Float));

        let expected = ExpectedState::default()
            .with_pin(Pin::Pin1, PinExpectation::declared(false))
            .with_pin(Pin::Pin2, PinExpectation::declared(false))
            .with_pin(Pin::Pin10, PinExpectation::declared(true))
            .with_variable("vert", VariableExpectation::value("200"))
            .with_variable("rouge", VariableExpectation::typed("100", VarType::Int));

        let verdict = validate(&state, &expected);
        assert!(!verdict.success);
        assert_eq!(
            verdict.errors,
            vec![
                "pin1 n'est pas déclaré",
                "pin2 ne devrait pas être allumé",
                "pin10 n'est pas déclaré",
                "pin10 devrait être allumé",
                "La variable \"vert\" est manquante",
                "La variable \"rouge\" devrait valoir 100",
                "La variable \"rouge\" devrait être de type int",
            ]
        );
    }

    #[test]
    fn test_unnamed_pins_and_variables_are_ignored() {
        let mut state = InterpreterState::new();
        state.declare(Pin::Pin9);
        state.assign("extra", Variable::new("1", VarType::Untyped));
        let verdict = validate(&state, &ExpectedState::default());
        assert_eq!(
            verdict,
            Verdict {
                success: true,
                errors: Vec::new()
            }
        );
    }

    #[test]
    fn test_check_feedback() {
        let expected = ExpectedState::default().with_pin(Pin::Pin1, PinExpectation::declared(true));

        let passed = check("void setup()\n{\n  pin1;\n  pin1_allumé;\n}", &expected, None);
        assert_eq!(passed, CheckOutcome::Passed);
        assert_eq!(passed.feedback().title, "Parfait !");
        assert_eq!(
            passed.completed(true),
            RunCompleted {
                success: true,
                errors: Vec::new(),
                last_exercise: true
            }
        );

        let failed = check("void setup()\n{\n  pin1;\n}", &expected, None);
        assert_eq!(
            failed.feedback(),
            Feedback {
                title: "Pas tout à fait...".to_string(),
                text: "Problèmes détectés : pin1 devrait être allumé".to_string(),
            }
        );
        assert!(!failed.completed(true).last_exercise);

        let broken = check("void setup()\n{\n  pin1_allumé;\n}", &expected, None);
        assert_eq!(
            broken.feedback().text,
            "Ligne 3: Erreur: pin1 n'a pas été déclaré!"
        );
        assert_eq!(
            check("   \n", &expected, None).errors(),
            vec!["Le code est vide!".to_string()]
        );
    }

    #[test]
    fn test_loop_policy() {
        let source = "void setup()\n{\n  pin1;\n}\nvoid loop()\n{\n  pin1_allumé;\n}";
        let expected = ExpectedState::default().with_pin(Pin::Pin1, PinExpectation::declared(true));

        assert_eq!(check(source, &expected, None), CheckOutcome::Passed);
        assert_eq!(check(source, &expected, Some(true)), CheckOutcome::Passed);
        assert_eq!(
            check(source, &expected, Some(false)),
            CheckOutcome::Failed(vec!["pin1 devrait être allumé".to_string()])
        );
    }
}
