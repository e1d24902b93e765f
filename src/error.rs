//! Error types for the recognition engine.
//!
//! Search itself never fails — bad inputs turn into a diagnostic FAILURE
//! report — so these errors cover the fallible edges: building calculators
//! and parsing RPN text back through the name tables.

use thiserror::Error;

/// Primary error type for the recognition engine.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A built-in calculator name was not recognized.
    #[error("unknown calculator: {name}")]
    UnknownCalculator {
        /// The name that failed to resolve.
        name: String,
    },

    /// A calculator was constructed with no constants at all; every
    /// valid RPN program needs at least one operand.
    #[error("calculator has no constants")]
    EmptyCalculator,

    /// A duplicate name inside one calculator table.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// Which table the clash occurred in (`constant`, `unary`, `binary`).
        kind: &'static str,
        /// The offending name.
        name: String,
    },

    /// An operator name in an RPN expression was not found in any table.
    #[error("unknown operator: {name}")]
    UnknownOperator {
        /// The token that failed to resolve.
        name: String,
    },

    /// An RPN expression parsed token-by-token but is not a valid
    /// single-value program (stack underflow, or leftover operands).
    #[error("malformed RPN program: {message}")]
    MalformedProgram {
        /// What the syntax scan rejected.
        message: String,
    },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::UnknownCalculator {
            name: "CALC5".to_string(),
        };
        assert!(err.to_string().contains("CALC5"));

        let err = SearchError::UnknownOperator {
            name: "CBRT".to_string(),
        };
        assert!(err.to_string().contains("CBRT"));
    }

    #[test]
    fn test_malformed_display() {
        let err = SearchError::MalformedProgram {
            message: "stack underflow at position 0".to_string(),
        };
        assert!(err.to_string().contains("underflow"));
    }
}
