//! CASIO HL-815L: a 17-button office calculator.
//!
//! Digits 0-9, square root, the percent key, the four arithmetic
//! operators, and digit concatenation (`NINE, NINE, II` = 99). A useful
//! minimal table for demonstrating how small calculators miss targets a
//! scientific one would express.

use super::{ops, BinaryOp, Calculator, ConstOp, UnaryOp};
use std::sync::OnceLock;

const CONSTS: &[ConstOp] = &[
    ConstOp {
        value: 0.0,
        name: "ZERO",
    },
    ConstOp {
        value: 1.0,
        name: "ONE",
    },
    ConstOp {
        value: 2.0,
        name: "TWO",
    },
    ConstOp {
        value: 3.0,
        name: "THREE",
    },
    ConstOp {
        value: 4.0,
        name: "FOUR",
    },
    ConstOp {
        value: 5.0,
        name: "FIVE",
    },
    ConstOp {
        value: 6.0,
        name: "SIX",
    },
    ConstOp {
        value: 7.0,
        name: "SEVEN",
    },
    ConstOp {
        value: 8.0,
        name: "EIGHT",
    },
    ConstOp {
        value: 9.0,
        name: "NINE",
    },
];

const FUNCS: &[UnaryOp] = &[
    UnaryOp {
        func: ops::sqrt,
        name: "SQRT",
    },
    UnaryOp {
        func: ops::percent,
        name: "PERCENT",
    },
];

const OPS: &[BinaryOp] = &[
    BinaryOp {
        func: ops::plus,
        name: "PLUS",
    },
    BinaryOp {
        func: ops::subtract,
        name: "SUBTRACT",
    },
    BinaryOp {
        func: ops::times,
        name: "TIMES",
    },
    BinaryOp {
        func: ops::divide,
        name: "DIVIDE",
    },
    BinaryOp {
        func: ops::concat,
        name: "II",
    },
];

/// The shared CASIO HL-815L instance.
pub fn casio() -> &'static Calculator {
    static CASIO: OnceLock<Calculator> = OnceLock::new();
    CASIO.get_or_init(|| {
        Calculator::new(CONSTS.to_vec(), FUNCS.to_vec(), OPS.to_vec())
            .expect("CASIO tables are well-formed")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_counts() {
        let calc = casio();
        assert_eq!(calc.n_const(), 10);
        assert_eq!(calc.n_unary(), 2);
        assert_eq!(calc.n_binary(), 5);
        assert_eq!(calc.n_total(), 17);
    }

    #[test]
    fn test_digit_concatenation_button() {
        let idx = casio().lookup_binary("II").unwrap();
        let f = casio().binary()[idx].func;
        assert_eq!(f(9.0, 9.0), 99.0);
    }
}
