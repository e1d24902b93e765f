//! VSearch - Symbolic Constant and Function Recognition
//!
//! This library takes a numeric target — a single value with an optional
//! uncertainty, or a table of `(x, y)` samples — and exhaustively searches
//! the space of Reverse-Polish (RPN) expressions over a configurable
//! calculator for the shortest expressions that reproduce it.
//!
//! # Features
//!
//! - **Three search modes**: constant recognition, function recognition
//!   (free variable `x`), and batch recognition (many targets in one pass)
//! - **Seven error metrics**: ABS, REL, MSE, MAE, MAX, plus the bit-level
//!   ULP and Hamming distances
//! - **Configurable calculators**: the 36-button CALC4 scientific table,
//!   a 17-button office calculator, and name-based sub-calculators
//! - **Deterministic sharding**: the skeleton space partitions exactly
//!   across any number of independent workers
//! - **Streaming reports**: every improvement and per-length milestone is
//!   recorded in a structured, JSON-serializable stream
//!
//! # Quick Start
//!
//! ```rust
//! use vsearch::{calc, search_constant, SearchOptions};
//!
//! // Recognize pi^2.
//! let opts = SearchOptions::new().with_k_range(1, 4);
//! let report = search_constant(9.869604401089358, 0.0, calc::calc4(), &opts);
//!
//! assert!(report.is_success());
//! assert_eq!(report.rpn, "PI, SQR");
//! ```
//!
//! # How the search works
//!
//! Candidate programs are enumerated in two levels. The outer level walks
//! *skeletons*: length-K strings over {constant, unary, binary} that pass
//! an RPN stack-discipline check (their count follows the Motzkin
//! numbers). The inner level walks *assignments*: every choice of a
//! concrete operator for each skeleton slot, depth-first in table order.
//! Each assignment is executed on a fixed-depth binary64 stack, scored
//! under the active metric, and compared against the best expression seen
//! so far; improvements stream out as `INTERMEDIATE` records until a
//! match criterion fires or the length budget is exhausted.
//!
//! Workers are embarrassingly parallel: give each one a distinct
//! `cpu_id` out of `ncpus` and it owns a disjoint shard of every
//! skeleton level. Aggregating the per-worker streams is the host's job.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod calc;
pub mod error;
pub mod eval;
pub mod formatter;
pub mod numeric;
pub mod program;
pub mod score;
pub mod search;
pub mod shard;
pub mod skeleton;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use calc::{BinaryOp, Calculator, ConstOp, UnaryOp};
pub use error::{Result, SearchError};
pub use formatter::{HumanFormatter, JsonFormatter, ReportFormatter};
pub use types::{
    CancelToken, CompareMode, DataPoint, ErrorMetric, Outcome, ResultRecord, ResultTag,
    RunStatus, SearchCounters, SearchMode, SearchOptions, SearchReport, MAX_CODE_LENGTH,
};

/// Recognize a single constant.
///
/// Searches for RPN expressions whose value matches `target`; `delta` is
/// the caller's absolute uncertainty (0 = none declared), which enables
/// the tolerance-based match branch.
///
/// # Example
///
/// ```rust
/// use vsearch::{calc, search_constant, SearchOptions};
///
/// let opts = SearchOptions::new().with_k_range(1, 3);
/// let report = search_constant(1.6180339887498949, 0.0, calc::calc4(), &opts);
/// assert_eq!(report.rpn, "GOLDENRATIO");
/// ```
pub fn search_constant(
    target: f64,
    delta: f64,
    calc: &Calculator,
    opts: &SearchOptions,
) -> SearchReport {
    let data = [DataPoint::constant(target, delta)];
    search::run(SearchMode::Constant, &data, calc, opts, 1)
}

/// Recognize a function of one variable from tabulated samples.
///
/// Every constant slot may also bind the free variable `x`; assignments
/// that never use `x` are skipped. The search succeeds when the aggregate
/// error over all samples falls below the function-match threshold.
pub fn search_function(
    data: &[DataPoint],
    calc: &Calculator,
    opts: &SearchOptions,
) -> SearchReport {
    search::run(SearchMode::Function, data, calc, opts, 1)
}

/// Recognize many constants in a single enumeration pass.
///
/// Each data point is one labeled target (`x` is the label). The search
/// halts once `num_to_find` targets have been matched; zero or negative
/// means "find them all".
pub fn search_batch(
    data: &[DataPoint],
    num_to_find: i32,
    calc: &Calculator,
    opts: &SearchOptions,
) -> SearchReport {
    search::run(SearchMode::Batch, data, calc, opts, num_to_find)
}

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
