//! Named operation functions used by the built-in calculator tables.
//!
//! The standard library exposes most of these only as methods; the tables
//! need plain `fn` pointers, so each operation gets a named wrapper here.
//! Custom calculators are welcome to reuse them.
//!
//! Binary functions follow the engine's argument-order contract: the
//! first parameter is the most recently pushed operand (the stack top).

/// Addition: `b + a`.
pub fn plus(b: f64, a: f64) -> f64 {
    b + a
}

/// Multiplication: `b * a`.
pub fn times(b: f64, a: f64) -> f64 {
    b * a
}

/// Subtraction: `b - a` (top minus second).
pub fn subtract(b: f64, a: f64) -> f64 {
    b - a
}

/// Division: `b / a` (top over second).
pub fn divide(b: f64, a: f64) -> f64 {
    b / a
}

/// Exponentiation: `b ^ a` (top raised to second).
pub fn power(b: f64, a: f64) -> f64 {
    b.powf(a)
}

/// Decimal digit concatenation: `concat(9, 9) = 99`.
///
/// The top operand supplies the leading digits: the second operand is
/// appended after it, shifted by its own decimal width.
pub fn concat(b: f64, a: f64) -> f64 {
    b * 10.0_f64.powf(1.0 + a.log10().floor()) + a
}

/// Natural logarithm.
pub fn log(x: f64) -> f64 {
    x.ln()
}

/// Natural exponential.
pub fn exp(x: f64) -> f64 {
    x.exp()
}

/// Reciprocal, `1/x`.
pub fn inv(x: f64) -> f64 {
    1.0 / x
}

/// Gamma function Γ(x).
pub fn gamma(x: f64) -> f64 {
    libm::tgamma(x)
}

/// Square root.
pub fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

/// Square, `x * x`.
pub fn sqr(x: f64) -> f64 {
    x * x
}

/// Percent key of desk calculators, `x / 100`.
pub fn percent(x: f64) -> f64 {
    0.01 * x
}

/// Sine.
pub fn sin(x: f64) -> f64 {
    x.sin()
}

/// Inverse sine.
pub fn asin(x: f64) -> f64 {
    x.asin()
}

/// Cosine.
pub fn cos(x: f64) -> f64 {
    x.cos()
}

/// Inverse cosine.
pub fn acos(x: f64) -> f64 {
    x.acos()
}

/// Tangent.
pub fn tan(x: f64) -> f64 {
    x.tan()
}

/// Inverse tangent.
pub fn atan(x: f64) -> f64 {
    x.atan()
}

/// Hyperbolic sine.
pub fn sinh(x: f64) -> f64 {
    x.sinh()
}

/// Inverse hyperbolic sine.
pub fn asinh(x: f64) -> f64 {
    x.asinh()
}

/// Hyperbolic cosine.
pub fn cosh(x: f64) -> f64 {
    x.cosh()
}

/// Inverse hyperbolic cosine.
pub fn acosh(x: f64) -> f64 {
    x.acosh()
}

/// Hyperbolic tangent.
pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

/// Inverse hyperbolic tangent.
pub fn atanh(x: f64) -> f64 {
    x.atanh()
}
