//! RPN program text: formatting expressions and parsing them back.
//!
//! An expression serializes as comma-separated operator names, with `x`
//! standing in for the free variable in function mode. Parsing inverts
//! the formatter through the calculator's name tables, so a formatted
//! program round-trips to the same skeleton + assignment.

use crate::calc::Calculator;
use crate::error::{Result, SearchError};
use crate::skeleton::{self, Slot};
use crate::types::SearchMode;

/// Render a program as comma-separated operator names.
///
/// In function mode, constant-slot index 0 renders as `x` and real
/// constants are shifted by one, mirroring the evaluator.
pub fn format_rpn(
    skeleton: &[Slot],
    indices: &[usize],
    calc: &Calculator,
    mode: SearchMode,
) -> String {
    let mut out = String::new();
    for (i, (slot, &idx)) in skeleton.iter().zip(indices).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let name = match slot {
            Slot::Constant => {
                if mode == SearchMode::Function && idx == 0 {
                    "x"
                } else if mode == SearchMode::Function {
                    calc.constants()[idx - 1].name
                } else {
                    calc.constants()[idx].name
                }
            }
            Slot::Unary => calc.unary()[idx].name,
            Slot::Binary => calc.binary()[idx].name,
        };
        out.push_str(name);
    }
    out
}

/// Parse comma-separated operator names back into a program.
///
/// Fails with [`SearchError::UnknownOperator`] on a name that is in no
/// table (including `x` outside function mode) and with
/// [`SearchError::MalformedProgram`] when the token sequence is not a
/// valid single-value RPN program.
pub fn parse_rpn(
    text: &str,
    calc: &Calculator,
    mode: SearchMode,
) -> Result<(Vec<Slot>, Vec<usize>)> {
    let mut slots = Vec::new();
    let mut indices = Vec::new();

    for token in text.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if mode == SearchMode::Function && token == "x" {
            slots.push(Slot::Constant);
            indices.push(0);
        } else if let Some(idx) = calc.lookup_const(token) {
            slots.push(Slot::Constant);
            indices.push(if mode == SearchMode::Function {
                idx + 1
            } else {
                idx
            });
        } else if let Some(idx) = calc.lookup_unary(token) {
            slots.push(Slot::Unary);
            indices.push(idx);
        } else if let Some(idx) = calc.lookup_binary(token) {
            slots.push(Slot::Binary);
            indices.push(idx);
        } else {
            return Err(SearchError::UnknownOperator {
                name: token.to_string(),
            });
        }
    }

    if slots.is_empty() {
        return Err(SearchError::MalformedProgram {
            message: "empty program".to_string(),
        });
    }
    if !skeleton::is_valid(&slots) {
        return Err(SearchError::MalformedProgram {
            message: format!("invalid stack discipline in \"{text}\""),
        });
    }

    Ok((slots, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::calc4;
    use crate::eval::evaluate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_constant_mode() {
        let skeleton = [Slot::Constant, Slot::Unary];
        let indices = [0, 5];
        let text = format_rpn(&skeleton, &indices, calc4(), SearchMode::Constant);
        assert_eq!(text, "PI, SQR");
    }

    #[test]
    fn test_format_function_mode_variable() {
        let skeleton = [Slot::Constant, Slot::Constant, Slot::Binary];
        let indices = [0, 1, 0]; // x, PI (shifted), PLUS
        let text = format_rpn(&skeleton, &indices, calc4(), SearchMode::Function);
        assert_eq!(text, "x, PI, PLUS");
    }

    #[test]
    fn test_round_trip_constant_mode() {
        let (slots, indices) =
            parse_rpn("TWO, PI, POWER", calc4(), SearchMode::Constant).unwrap();
        assert_eq!(
            format_rpn(&slots, &indices, calc4(), SearchMode::Constant),
            "TWO, PI, POWER"
        );
        let v = evaluate(&slots, &indices, calc4(), SearchMode::Constant, 0.0);
        assert_eq!(v, std::f64::consts::PI.powf(2.0));
    }

    #[test]
    fn test_round_trip_function_mode() {
        let (slots, indices) = parse_rpn("x, EXP", calc4(), SearchMode::Function).unwrap();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(
            format_rpn(&slots, &indices, calc4(), SearchMode::Function),
            "x, EXP"
        );
        let v = evaluate(&slots, &indices, calc4(), SearchMode::Function, 3.0);
        assert_eq!(v, 3.0f64.exp());
    }

    #[test]
    fn test_unknown_operator() {
        let err = parse_rpn("PI, CBRT", calc4(), SearchMode::Constant).unwrap_err();
        assert!(matches!(err, SearchError::UnknownOperator { .. }));
    }

    #[test]
    fn test_variable_outside_function_mode() {
        let err = parse_rpn("x, EXP", calc4(), SearchMode::Constant).unwrap_err();
        assert!(matches!(err, SearchError::UnknownOperator { .. }));
    }

    #[test]
    fn test_malformed_programs() {
        for text in ["PLUS", "ONE, TWO", ""] {
            let err = parse_rpn(text, calc4(), SearchMode::Constant).unwrap_err();
            assert!(
                matches!(err, SearchError::MalformedProgram { .. }),
                "{text:?}"
            );
        }
    }
}
