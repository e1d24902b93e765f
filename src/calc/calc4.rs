//! CALC4: the 36-button scientific RPN calculator.
//!
//! 13 constants, 18 unary functions, 5 binary operators. This is the
//! master table for name-based configuration: [`Calculator::subset`] picks
//! sub-calculators out of it by name.
//!
//! [`Calculator::subset`]: super::Calculator::subset

use super::{ops, BinaryOp, Calculator, ConstOp, UnaryOp};
use std::sync::OnceLock;

/// Golden ratio φ = (1 + √5) / 2.
const GOLDEN_RATIO: f64 = 1.618_033_988_749_894_8;

const CONSTS: &[ConstOp] = &[
    ConstOp {
        value: std::f64::consts::PI,
        name: "PI",
    },
    ConstOp {
        value: std::f64::consts::E,
        name: "EULER",
    },
    ConstOp {
        value: -1.0,
        name: "NEG",
    },
    ConstOp {
        value: GOLDEN_RATIO,
        name: "GOLDENRATIO",
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
        func: ops::log,
        name: "LOG",
    },
    UnaryOp {
        func: ops::exp,
        name: "EXP",
    },
    UnaryOp {
        func: ops::inv,
        name: "INV",
    },
    UnaryOp {
        func: ops::gamma,
        name: "GAMMA",
    },
    UnaryOp {
        func: ops::sqrt,
        name: "SQRT",
    },
    UnaryOp {
        func: ops::sqr,
        name: "SQR",
    },
    UnaryOp {
        func: ops::sin,
        name: "SIN",
    },
    UnaryOp {
        func: ops::asin,
        name: "ARCSIN",
    },
    UnaryOp {
        func: ops::cos,
        name: "COS",
    },
    UnaryOp {
        func: ops::acos,
        name: "ARCCOS",
    },
    UnaryOp {
        func: ops::tan,
        name: "TAN",
    },
    UnaryOp {
        func: ops::atan,
        name: "ARCTAN",
    },
    UnaryOp {
        func: ops::sinh,
        name: "SINH",
    },
    UnaryOp {
        func: ops::asinh,
        name: "ARCSINH",
    },
    UnaryOp {
        func: ops::cosh,
        name: "COSH",
    },
    UnaryOp {
        func: ops::acosh,
        name: "ARCCOSH",
    },
    UnaryOp {
        func: ops::tanh,
        name: "TANH",
    },
    UnaryOp {
        func: ops::atanh,
        name: "ARCTANH",
    },
];

const OPS: &[BinaryOp] = &[
    BinaryOp {
        func: ops::plus,
        name: "PLUS",
    },
    BinaryOp {
        func: ops::times,
        name: "TIMES",
    },
    BinaryOp {
        func: ops::subtract,
        name: "SUBTRACT",
    },
    BinaryOp {
        func: ops::divide,
        name: "DIVIDE",
    },
    BinaryOp {
        func: ops::power,
        name: "POWER",
    },
];

/// The shared CALC4 instance.
pub fn calc4() -> &'static Calculator {
    static CALC4: OnceLock<Calculator> = OnceLock::new();
    CALC4.get_or_init(|| {
        Calculator::new(CONSTS.to_vec(), FUNCS.to_vec(), OPS.to_vec())
            .expect("CALC4 tables are well-formed")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_counts() {
        let calc = calc4();
        assert_eq!(calc.n_const(), 13);
        assert_eq!(calc.n_unary(), 18);
        assert_eq!(calc.n_binary(), 5);
        assert_eq!(calc.n_total(), 36);
    }

    #[test]
    fn test_golden_ratio_value() {
        let idx = calc4().lookup_const("GOLDENRATIO").unwrap();
        let phi = calc4().constants()[idx].value;
        assert!((phi - (1.0 + 5.0_f64.sqrt()) / 2.0).abs() < 1.0e-15);
    }

    #[test]
    fn test_small_integers() {
        let calc = calc4();
        for (name, value) in [("ONE", 1.0), ("TWO", 2.0), ("NINE", 9.0), ("NEG", -1.0)] {
            let idx = calc.lookup_const(name).unwrap();
            assert_eq!(calc.constants()[idx].value, value);
        }
    }
}
