//! Calculator registry: the immutable operation tables a search draws from.
//!
//! A [`Calculator`] is an ordered triple of tables — constants, unary
//! functions, binary operators — with unique names per table. The tables
//! are built once, shared read-only, and outlive the search; workers only
//! ever index into them.
//!
//! Binary operators observe the engine's argument-order contract: the
//! function receives the most recently pushed operand **first**, so
//! `divide(b, a) = b / a` where `b` is the stack top.

pub mod calc4;
pub mod casio;
pub mod ops;

use crate::error::{Result, SearchError};

pub use calc4::calc4;
pub use casio::casio;

/// A named constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstOp {
    /// The constant's value.
    pub value: f64,
    /// Stable identifier used in RPN serialization.
    pub name: &'static str,
}

/// A named unary function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryOp {
    /// The function, applied to the stack top in place.
    pub func: fn(f64) -> f64,
    /// Stable identifier used in RPN serialization.
    pub name: &'static str,
}

/// A named binary operator.
///
/// The first argument is the most recently pushed operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryOp {
    /// The operator, called as `func(top, second)`.
    pub func: fn(f64, f64) -> f64,
    /// Stable identifier used in RPN serialization.
    pub name: &'static str,
}

/// Immutable set of operations available to a search.
#[derive(Debug, Clone)]
pub struct Calculator {
    constants: Vec<ConstOp>,
    unary: Vec<UnaryOp>,
    binary: Vec<BinaryOp>,
}

impl Calculator {
    /// Build a calculator from three tables.
    ///
    /// Fails with [`SearchError::EmptyCalculator`] when the constant table
    /// is empty (no valid RPN program exists without an operand) and with
    /// [`SearchError::DuplicateName`] when a name repeats within a table.
    pub fn new(
        constants: Vec<ConstOp>,
        unary: Vec<UnaryOp>,
        binary: Vec<BinaryOp>,
    ) -> Result<Self> {
        if constants.is_empty() {
            return Err(SearchError::EmptyCalculator);
        }
        check_unique("constant", constants.iter().map(|c| c.name))?;
        check_unique("unary", unary.iter().map(|u| u.name))?;
        check_unique("binary", binary.iter().map(|b| b.name))?;
        Ok(Self {
            constants,
            unary,
            binary,
        })
    }

    /// Number of constants.
    pub fn n_const(&self) -> usize {
        self.constants.len()
    }

    /// Number of unary functions.
    pub fn n_unary(&self) -> usize {
        self.unary.len()
    }

    /// Number of binary operators.
    pub fn n_binary(&self) -> usize {
        self.binary.len()
    }

    /// Total button count.
    pub fn n_total(&self) -> usize {
        self.constants.len() + self.unary.len() + self.binary.len()
    }

    /// The constant table.
    pub fn constants(&self) -> &[ConstOp] {
        &self.constants
    }

    /// The unary table.
    pub fn unary(&self) -> &[UnaryOp] {
        &self.unary
    }

    /// The binary table.
    pub fn binary(&self) -> &[BinaryOp] {
        &self.binary
    }

    /// Index of a constant by name.
    pub fn lookup_const(&self, name: &str) -> Option<usize> {
        self.constants.iter().position(|c| c.name == name)
    }

    /// Index of a unary function by name.
    pub fn lookup_unary(&self, name: &str) -> Option<usize> {
        self.unary.iter().position(|u| u.name == name)
    }

    /// Index of a binary operator by name.
    pub fn lookup_binary(&self, name: &str) -> Option<usize> {
        self.binary.iter().position(|b| b.name == name)
    }

    /// Build a sub-calculator from comma-separated name lists.
    ///
    /// `None` means "keep the whole table"; an empty string means "this
    /// category is empty". Unknown names are silently skipped; surviving
    /// entries keep the order of their first appearance in the caller's
    /// list. An empty constant table still fails, as in [`Calculator::new`].
    pub fn subset(
        &self,
        consts: Option<&str>,
        unaries: Option<&str>,
        binaries: Option<&str>,
    ) -> Result<Calculator> {
        let constants = match consts {
            None => self.constants.clone(),
            Some(list) => pick(list, |name| {
                self.lookup_const(name).map(|i| self.constants[i])
            }),
        };
        let unary = match unaries {
            None => self.unary.clone(),
            Some(list) => pick(list, |name| self.lookup_unary(name).map(|i| self.unary[i])),
        };
        let binary = match binaries {
            None => self.binary.clone(),
            Some(list) => pick(list, |name| {
                self.lookup_binary(name).map(|i| self.binary[i])
            }),
        };
        Calculator::new(constants, unary, binary)
    }
}

/// Resolve a built-in calculator by name.
///
/// Recognized names (case-insensitive): `CALC4` (the 36-button scientific
/// calculator) and `CASIO` (the 17-button office calculator). Anything
/// else fails with [`SearchError::UnknownCalculator`].
pub fn by_name(name: &str) -> Result<&'static Calculator> {
    if name.eq_ignore_ascii_case("CALC4") {
        Ok(calc4())
    } else if name.eq_ignore_ascii_case("CASIO") || name.eq_ignore_ascii_case("CASIO_HL_815L") {
        Ok(casio())
    } else {
        Err(SearchError::UnknownCalculator {
            name: name.to_string(),
        })
    }
}

fn check_unique<'a>(kind: &'static str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = Vec::new();
    for name in names {
        if seen.contains(&name) {
            return Err(SearchError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
        seen.push(name);
    }
    Ok(())
}

fn pick<T>(list: &str, resolve: impl Fn(&str) -> Option<T>) -> Vec<T> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| resolve(token))
        .collect()
}
