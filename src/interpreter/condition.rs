//! Condition evaluation
//!
//! Both sides of a comparison are read as numbers with "leading number"
//! semantics: the longest numeric prefix counts (`"5abc"` is 5) and text with
//! no numeric prefix is NaN. Comparing a string-valued variable therefore
//! makes every operator false except `!=`, which is true.

use crate::interpreter::errors::ErrorKind;
use crate::interpreter::state::InterpreterState;
use crate::parser::condition::Condition;

/// Parse and evaluate a `si` condition against the current bindings
pub fn evaluate(text: &str, state: &InterpreterState) -> Result<bool, ErrorKind> {
    let condition = Condition::parse(text)?;
    let variable = state
        .variable(&condition.variable)
        .ok_or_else(|| ErrorKind::UndeclaredVariable(condition.variable.clone()))?;

    let left = leading_number(&variable.value);
    let right = leading_number(&condition.literal);
    let result = condition.op.apply(left, right);

    tracing::trace!(
        variable = %condition.variable,
        op = condition.op.symbol(),
        left,
        right,
        result,
        "condition evaluated"
    );
    Ok(result)
}

/// The value of the longest numeric prefix of `text`, or NaN if there is none
pub fn leading_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return match bytes.first() {
            Some(b'-') => f64::NEG_INFINITY,
            _ => f64::INFINITY,
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::state::{VarType, Variable};

    fn state_with(name: &str, value: &str) -> InterpreterState {
        let mut state = InterpreterState::new();
        state.assign(name, Variable::new(value, VarType::Int));
        state
    }

    #[test]
    fn test_equal_and_not_equal() {
        let state = state_with("capteur", "0");
        assert_eq!(evaluate("capteur == 0", &state), Ok(true));
        assert_eq!(evaluate("capteur != 0", &state), Ok(false));
        assert_eq!(evaluate("(capteur == 1)", &state), Ok(false));
    }

    #[test]
    fn test_ordering_operators_compare_numerically() {
        let state = state_with("temperature", "25");
        assert_eq!(evaluate("temperature > 9", &state), Ok(true));
        assert_eq!(evaluate("temperature < 100", &state), Ok(true));
        assert_eq!(evaluate("temperature >= 25.0", &state), Ok(true));
        assert_eq!(evaluate("temperature <= 24.9", &state), Ok(false));
    }

    #[test]
    fn test_undeclared_variable() {
        let state = InterpreterState::new();
        assert_eq!(
            evaluate("mode == 1", &state),
            Err(ErrorKind::UndeclaredVariable("mode".to_string()))
        );
    }

    #[test]
    fn test_variable_names_are_case_sensitive() {
        let state = state_with("Mode", "1");
        assert_eq!(
            evaluate("mode == 1", &state),
            Err(ErrorKind::UndeclaredVariable("mode".to_string()))
        );
    }

    #[test]
    fn test_text_values_compare_as_nan() {
        let state = state_with("message", "\"salut\"");
        assert_eq!(evaluate("message == \"salut\"", &state), Ok(false));
        assert_eq!(evaluate("message < 1", &state), Ok(false));
        assert_eq!(evaluate("message != \"salut\"", &state), Ok(true));
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("5"), 5.0);
        assert_eq!(leading_number("  -3.5"), -3.5);
        assert_eq!(leading_number("5abc"), 5.0);
        assert_eq!(leading_number(".5"), 0.5);
        assert_eq!(leading_number("5."), 5.0);
        assert_eq!(leading_number("1e3x"), 1000.0);
        assert_eq!(leading_number("2e"), 2.0);
        assert_eq!(leading_number("Infinity"), f64::INFINITY);
        assert!(leading_number("abc").is_nan());
        assert!(leading_number(".").is_nan());
        assert!(leading_number("-").is_nan());
        assert!(leading_number("").is_nan());
    }
}
