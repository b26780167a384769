// Integration tests for the pin language: classify, walk, grade

use pinquest::config::Timing;
use pinquest::content::Course;
use pinquest::interpreter::errors::{ErrorKind, ExecutionError};
use pinquest::interpreter::events::{ExecutionEvent, Side};
use pinquest::interpreter::runner::{Runner, ThreadSleeper};
use pinquest::interpreter::state::{Pin, VarType};
use pinquest::interpreter::walker::{run_silent, Outcome};
use pinquest::validator::{
    check, validate, CheckOutcome, ExpectedState, PinExpectation, VariableExpectation,
};
use pretty_assertions::assert_eq;

const VITESSE: &str = r#"void setup()
{
    pin1;
    int vitesse = 5;
    pin1_allumé;
}
void loop()
{
}"#;

fn vitesse_expectation() -> ExpectedState {
    serde_json::from_str(
        r#"{
            "pins": { "pin1": { "declared": true, "on": true } },
            "variables": { "vitesse": { "value": "5", "type": "int" } }
        }"#,
    )
    .expect("valid expectation")
}

#[test]
fn test_vitesse_program_passes() {
    let outcome = check(VITESSE, &vitesse_expectation(), None);
    assert_eq!(outcome, CheckOutcome::Passed);
    assert!(outcome.errors().is_empty());
}

#[test]
fn test_execution_error_preempts_validation() {
    let source = VITESSE.replace("    pin1;\n", "");
    let outcome = check(&source, &vitesse_expectation(), None);
    assert_eq!(
        outcome,
        CheckOutcome::ExecutionFailed(ExecutionError::new(3, ErrorKind::PinNotDeclared(Pin::Pin1)))
    );
    assert_eq!(outcome.feedback().title, "Erreur détectée");
}

#[test]
fn test_validator_reports_declaration_first() {
    // Same program without the declaration nor the switch: the run completes
    let source = VITESSE
        .replace("    pin1;\n", "")
        .replace("    pin1_allumé;\n", "");
    let report = run_silent(&source, 0);
    assert_eq!(report.outcome, Outcome::Completed);

    let verdict = validate(&report.state, &vitesse_expectation());
    assert_eq!(
        verdict.errors,
        vec!["pin1 n'est pas déclaré", "pin1 devrait être allumé"]
    );
}

#[test]
fn test_conditionals() {
    let lit = ExpectedState::default().with_pin(Pin::Pin1, PinExpectation::declared(true));
    let dark = ExpectedState::default().with_pin(Pin::Pin1, PinExpectation::declared(false));

    let taken = "void setup()\n{\n    pin1;\n    int capteur = 0;\n    si (capteur == 0) alors {\n        pin1_allumé;\n    }\n}";
    assert_eq!(check(taken, &lit, None), CheckOutcome::Passed);

    let skipped = "void setup()\n{\n    pin1;\n    int mode = 5;\n    si (mode == 1) alors {\n        pin1_allumé;\n    }\n}";
    assert_eq!(check(skipped, &dark, None), CheckOutcome::Passed);
}

#[test]
fn test_missing_semicolon_on_each_statement_kind() {
    let statements = ["pin1", "pin1_allumé", "int x = 1", "x = 2", "String nom = \"a\""];
    for statement in statements {
        let source = format!("void setup()\n{{\n    pin1;\n    int x = 0;\n    {}\n}}", statement);
        assert_eq!(
            run_silent(&source, 0).outcome,
            Outcome::Failed(ExecutionError::new(4, ErrorKind::MissingSemicolon)),
            "statement {:?}",
            statement
        );
    }
}

#[test]
fn test_switch_before_declaration() {
    let source = "void setup()\n{\n    pin2_allumé;\n    pin2;\n}";
    let error = run_silent(source, 0).into_result().unwrap_err();
    assert_eq!(error.kind, ErrorKind::PinNotDeclared(Pin::Pin2));
    assert_eq!(error.message(), "Erreur: pin2 n'a pas été déclaré!");
}

#[test]
fn test_untyped_assignment_fails_type_expectation() {
    let source = VITESSE.replace("int vitesse", "vitesse");
    assert_eq!(
        check(&source, &vitesse_expectation(), None),
        CheckOutcome::Failed(vec![
            "La variable \"vitesse\" devrait être de type int".to_string()
        ])
    );
}

#[test]
fn test_keywords_and_accents_are_forgiving() {
    let source = "VOID SETUP()\n{\n    PIN1;\n    Int vitesse = 5;\n    pin1_allume;\n}";
    assert_eq!(check(source, &vitesse_expectation(), None), CheckOutcome::Passed);
}

#[test]
fn test_loop_body_counts_when_it_switches_pins() {
    let source = "void setup()\n{\n    pin9;\n}\n\nvoid loop()\n{\n    pin9_allumé;\n}";
    let expected = ExpectedState::default().with_pin(Pin::Pin9, PinExpectation::declared(true));
    assert_eq!(check(source, &expected, None), CheckOutcome::Passed);
    assert!(!check(source, &expected, Some(false)).success());
}

#[test]
fn test_string_comparison_follows_numeric_coercion() {
    let source = "void setup()\n{\n    pin1;\n    pin2;\n    String nom = \"Léa\";\n    si (nom != \"Léa\") alors {\n        pin1_allumé;\n    }\n    si (nom == \"Léa\") alors {\n        pin2_allumé;\n    }\n}";
    let expected = ExpectedState::default()
        .with_pin(Pin::Pin1, PinExpectation::declared(true))
        .with_pin(Pin::Pin2, PinExpectation::declared(false))
        .with_variable("nom", VariableExpectation::typed("\"Léa\"", VarType::String));
    assert_eq!(check(source, &expected, None), CheckOutcome::Passed);
}

#[test]
fn test_animated_and_silent_runs_agree() {
    let mut runner = Runner::new(Timing::instant());
    assert!(runner.start(VITESSE, Side::Student, false));
    let mut events = Vec::new();
    let animated = runner.play(&mut events, &mut ThreadSleeper).unwrap();
    let silent = run_silent(VITESSE, 0);

    assert_eq!(animated, silent);
    assert!(events.contains(&ExecutionEvent::VariableSet {
        side: Side::Student,
        name: "vitesse".to_string(),
        display: "5 (int)".to_string(),
    }));
}

#[test]
fn test_builtin_exercises_are_solvable() {
    let course = Course::builtin().unwrap();
    let solutions = [
        (0, 0, "pin1;\nint vitesse = 5;\npin1_allumé;"),
        (0, 1, "pin9;\nint puissance = 10;\npin9_allumé;"),
        (0, 2, "pin1;\npin9;\nint niveau = 3;\npin1_allumé;\npin9_allumé;"),
        (1, 0, "pin1;\npin2;\nint temperature = 20;\nint humidite = 60;\npin1_allumé;\npin2_allumé;"),
        (1, 1, "pin9;\npin10;\nint capteur1 = 15;\nint capteur2 = 25;\npin9_allumé;\npin10_allumé;"),
        (1, 2, "pin1;\npin2;\npin10;\nint rouge = 100;\nint vert = 200;\nint bleu = 50;\npin2_allumé;\npin10_allumé;"),
        (2, 0, "pin9;\nint temperature = 20;\nsi (temperature == 20) alors {\npin9_allumé;\n}"),
        (2, 1, "pin2;\nint niveau = 10;\nsi (niveau == 5) alors {\npin2_allumé;\n}"),
        (2, 2, "pin1;\npin10;\nint systeme = 1;\npin1_allumé;\nsi (systeme == 1) alors {\npin10_allumé;\n}"),
    ];

    for (level, exercise, body) in solutions {
        let exercise = &course.levels[level].exercises[exercise];
        let source = format!("void setup()\n{{\n{}\n}}\n\nvoid loop()\n{{\n}}", body);
        assert_eq!(
            check(&source, &exercise.expected_state, exercise.validate_loop),
            CheckOutcome::Passed,
            "level {} exercise {}",
            level + 1,
            exercise.number
        );
    }
}

#[test]
fn test_example_code_does_not_solve_its_exercise() {
    let course = Course::builtin().unwrap();
    let exercise = &course.levels[0].exercises[0];
    let outcome = check(&exercise.example_code, &exercise.expected_state, None);
    assert_eq!(
        outcome.errors(),
        vec!["La variable \"vitesse\" est manquante".to_string()]
    );
}

#[test]
fn test_braces_inside_strings_are_plain_text() {
    let expected = ExpectedState::default()
        .with_pin(Pin::Pin1, PinExpectation::declared(true))
        .with_variable("s", VariableExpectation::typed("\"}\"", VarType::String));
    let source = "void setup()\n{\n    String s = \"}\";\n    pin1;\n    pin1_allumé;\n}\nvoid loop()\n{\n}";
    assert_eq!(check(source, &expected, None), CheckOutcome::Passed);
}

#[test]
fn test_compound_condition_is_reported() {
    let source = "void setup()\n{\n    pin1;\n    int x = 1;\n    si ((x == 1) && (y == 2)) alors {\n        pin1_allumé;\n    }\n}";
    let expected = ExpectedState::default().with_pin(Pin::Pin1, PinExpectation::declared(false));
    assert_eq!(
        check(source, &expected, None),
        CheckOutcome::ExecutionFailed(ExecutionError::new(4, ErrorKind::InvalidCondition))
    );
}
