//! Core types for the recognition engine.
//!
//! This module defines the vocabulary shared by every stage of a search:
//! search modes, error metrics, comparison modes, data points, engine
//! options, and the structured report that a finished search produces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Maximum RPN program length the engine will enumerate.
pub const MAX_CODE_LENGTH: usize = 32;

/// What kind of target the engine is searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchMode {
    /// A single numeric value; no free variable.
    Constant,
    /// Tabulated `(x, y)` samples; the free variable `x` may appear in
    /// any constant slot.
    Function,
    /// Multiple labeled values; one formula is sought per target.
    Batch,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Constant => write!(f, "CONSTANT"),
            SearchMode::Function => write!(f, "FUNCTION"),
            SearchMode::Batch => write!(f, "BATCH"),
        }
    }
}

/// Error metric used to score a candidate expression against the target.
///
/// The continuous metrics (ABS, REL, MSE, MAE, MAX) measure numeric
/// distance; the discrete metrics (ULP, HAMMING) operate on the IEEE-754
/// bit patterns and are useful for exact matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorMetric {
    /// Absolute error `|v - t|`.
    Abs,
    /// Relative error `|v/t - 1|`, falling back to `|v|` when `t = 0`.
    Rel,
    /// Mean squared error over a data set.
    Mse,
    /// Mean absolute error over a data set.
    Mae,
    /// Maximum absolute error over a data set.
    Max,
    /// ULP distance between the binary64 encodings.
    Ulp,
    /// Popcount of the XOR of the binary64 encodings.
    Hamming,
}

impl fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorMetric::Abs => "ABS",
            ErrorMetric::Rel => "REL",
            ErrorMetric::Mse => "MSE",
            ErrorMetric::Mae => "MAE",
            ErrorMetric::Max => "MAX",
            ErrorMetric::Ulp => "ULP",
            ErrorMetric::Hamming => "HAMMING",
        };
        write!(f, "{}", name)
    }
}

/// Whether an equally good candidate replaces the current best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompareMode {
    /// `err < best_err`: the first best found wins.
    Strict,
    /// `err <= best_err`: ties re-emit, listing equivalent formulas.
    Equal,
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareMode::Strict => write!(f, "STRICT"),
            CompareMode::Equal => write!(f, "EQUAL"),
        }
    }
}

/// One target sample.
///
/// The meaning of `x` depends on the search mode: it is ignored for
/// constant recognition, it is the independent variable for function
/// recognition, and it is the target label for batch recognition.
/// `dy` is the caller-declared absolute tolerance; `0` means unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Independent variable (function mode) or target id (batch mode).
    pub x: f64,
    /// Target value.
    pub y: f64,
    /// Absolute tolerance; `0` = unspecified.
    pub dy: f64,
}

impl DataPoint {
    /// A single constant-recognition target.
    pub fn constant(y: f64, dy: f64) -> Self {
        Self { x: 0.0, y, dy }
    }

    /// A function-recognition sample `(x, y)` with no tolerance.
    pub fn sample(x: f64, y: f64) -> Self {
        Self { x, y, dy: 0.0 }
    }

    /// A labeled batch target.
    pub fn target(id: f64, y: f64, dy: f64) -> Self {
        Self { x: id, y, dy }
    }
}

/// Cooperative cancellation handle.
///
/// A worker polls the token between skeletons; an external host (for
/// example another worker that already found the answer) flips it. The
/// poll is a single relaxed atomic load.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a fresh, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. All clones observe the request.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options controlling a single worker's search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Smallest program length to try (inclusive, `>= 1`).
    pub k_min: u32,
    /// Largest program length to try (inclusive, `<= MAX_CODE_LENGTH`).
    pub k_max: u32,
    /// This worker's shard index, `0 <= cpu_id < ncpus`.
    pub cpu_id: u32,
    /// Total number of workers sharing the skeleton space.
    pub ncpus: u32,
    /// Error metric to score candidates with.
    pub metric: ErrorMetric,
    /// Best-candidate comparison mode.
    pub compare: CompareMode,
    /// Cap on the number of streamed result records; once reached,
    /// further records are dropped and the report is marked truncated.
    pub max_records: usize,
    /// Optional cooperative cancellation token, polled per skeleton.
    pub cancel: Option<CancelToken>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            k_min: 1,
            k_max: 6,
            cpu_id: 0,
            ncpus: 1,
            metric: ErrorMetric::Rel,
            compare: CompareMode::Strict,
            max_records: 4096,
            cancel: None,
        }
    }
}

impl SearchOptions {
    /// Options with default settings (`K ∈ [1, 6]`, single worker,
    /// relative error, strict comparison).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the program-length range.
    pub fn with_k_range(mut self, k_min: u32, k_max: u32) -> Self {
        self.k_min = k_min;
        self.k_max = k_max;
        self
    }

    /// Set this worker's shard.
    pub fn with_shard(mut self, cpu_id: u32, ncpus: u32) -> Self {
        self.cpu_id = cpu_id;
        self.ncpus = ncpus;
        self
    }

    /// Set the error metric.
    pub fn with_metric(mut self, metric: ErrorMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the comparison mode.
    pub fn with_compare(mut self, compare: CompareMode) -> Self {
        self.compare = compare;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Tag classifying a streamed result record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultTag {
    /// A new best candidate for some target.
    #[serde(rename = "INTERMEDIATE")]
    Intermediate,
    /// Best-so-far milestone emitted after exhausting a code length.
    #[serde(rename = "K_BEST")]
    KBest,
    /// A target was matched (batch mode).
    #[serde(rename = "SUCCESS")]
    Success,
    /// Final best approximation for a target that was never matched.
    #[serde(rename = "BEST")]
    Best,
    /// The early-abort heuristic fired.
    #[serde(rename = "ABORTED")]
    Aborted,
    /// No candidate was found at all.
    #[serde(rename = "FAILURE")]
    Failure,
}

/// Whether the stream was still running when a record was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    /// Emitted mid-search.
    #[serde(rename = "RUNNING")]
    Running,
    /// Emitted at termination.
    #[serde(rename = "FINISHED")]
    Finished,
}

/// Final result classification for a whole search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every requested target was matched.
    #[serde(rename = "SUCCESS")]
    Success,
    /// Some, but not all, targets were matched (batch mode).
    #[serde(rename = "PARTIAL")]
    Partial,
    /// No target was matched.
    #[serde(rename = "FAILURE")]
    Failure,
    /// The early-abort heuristic cut the search short.
    #[serde(rename = "ABORTED")]
    Aborted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Partial => write!(f, "PARTIAL"),
            Outcome::Failure => write!(f, "FAILURE"),
            Outcome::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// One record of the result stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Target label; only present in batch mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<f64>,
    /// Target value; only present in batch mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    /// Code length of the reported level.
    #[serde(rename = "K")]
    pub k: u32,
    /// Error of the reported expression under the active metric.
    #[serde(rename = "REL_ERR")]
    pub err: f64,
    /// Record classification.
    pub result: ResultTag,
    /// Stream state at emission time.
    pub status: RunStatus,
    /// Worker that produced the record.
    #[serde(rename = "cpuId")]
    pub cpu_id: u32,
    /// Hamming distance between the expression's value and the target.
    #[serde(
        rename = "HAMMING_DISTANCE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hamming: Option<u32>,
    /// The expression, as comma-separated operator names.
    #[serde(rename = "RPN")]
    pub rpn: String,
}

/// Global enumeration counters for one worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCounters {
    /// Ternary candidates visited (valid or not).
    pub total_ternary: u64,
    /// Candidates that passed the RPN syntax check.
    pub valid_ternary: u64,
    /// Completed operator assignments evaluated.
    pub evaluations: u64,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Complete result stream of one worker: header, ordered records, and
/// terminal summary. Serializes to the engine's JSON document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Crate version that produced the stream.
    pub version: String,
    /// Target architecture of the build.
    pub arch: String,
    /// Target operating system of the build.
    pub os: String,
    /// Active search mode.
    pub mode: SearchMode,
    /// Active error metric.
    pub metric: ErrorMetric,
    /// Active comparison mode.
    pub compare: CompareMode,
    /// Number of data points supplied.
    pub n_data: usize,
    /// First target value (the only one outside batch mode).
    pub target: f64,
    /// First target tolerance.
    pub delta: f64,
    /// How many targets had to be matched for SUCCESS.
    pub num_to_find: usize,
    /// Worker shard index.
    #[serde(rename = "cpuId")]
    pub cpu_id: u32,
    /// Total worker count.
    pub ncpus: u32,
    /// Smallest code length searched.
    #[serde(rename = "minK")]
    pub min_k: u32,
    /// Largest code length searched.
    #[serde(rename = "maxK")]
    pub max_k: u32,
    /// Calculator constant count.
    pub n_const: usize,
    /// Calculator unary count.
    pub n_unary: usize,
    /// Calculator binary count.
    pub n_binary: usize,
    /// Total calculator size.
    pub n_total: usize,
    /// Ordered result records, in enumeration order.
    pub results: Vec<ResultRecord>,
    /// Final classification.
    pub result: Outcome,
    /// Globally best expression (first target in batch mode).
    #[serde(rename = "RPN")]
    pub rpn: String,
    /// Error of the best expression.
    #[serde(rename = "REL_ERR")]
    pub err: f64,
    /// Caller-declared input tolerance, echoed back.
    #[serde(
        rename = "INPUT_ABS_ERR",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub input_abs_err: Option<f64>,
    /// Compression ratio of the best expression.
    #[serde(
        rename = "COMPRESSION_RATIO",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub compression_ratio: Option<f64>,
    /// Code length of the best expression.
    #[serde(rename = "K")]
    pub k: u32,
    /// Always `FINISHED` on a completed report.
    pub status: RunStatus,
    /// Hamming distance of the best expression's value to the target.
    #[serde(
        rename = "HAMMING_DISTANCE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hamming: Option<u32>,
    /// Matched target count (constant/batch modes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_found: Option<usize>,
    /// Unmatched target count (constant/batch modes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_not_found: Option<usize>,
    /// Ternary candidates visited.
    pub total_ternary: u64,
    /// Candidates that passed the syntax check.
    pub valid_ternary: u64,
    /// Operator assignments evaluated.
    pub evaluations: u64,
    /// Present when the search was rejected before running (bad inputs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    /// Set when the record cap dropped part of the stream.
    #[serde(default, skip_serializing_if = "is_false")]
    pub truncated: bool,
}

impl SearchReport {
    /// Whether the search ended in full success.
    pub fn is_success(&self) -> bool {
        self.result == Outcome::Success
    }

    /// The errors of the `INTERMEDIATE` records, in stream order.
    pub fn intermediate_errors(&self) -> Vec<f64> {
        self.results
            .iter()
            .filter(|r| r.result == ResultTag::Intermediate)
            .map(|r| r.err)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_display() {
        assert_eq!(ErrorMetric::Rel.to_string(), "REL");
        assert_eq!(ErrorMetric::Hamming.to_string(), "HAMMING");
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&SearchMode::Constant).unwrap();
        assert_eq!(json, "\"CONSTANT\"");
        let json = serde_json::to_string(&ResultTag::KBest).unwrap();
        assert_eq!(json, "\"K_BEST\"");
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_options_builder() {
        let opts = SearchOptions::new()
            .with_k_range(2, 5)
            .with_shard(3, 8)
            .with_metric(ErrorMetric::Ulp)
            .with_compare(CompareMode::Equal);
        assert_eq!(opts.k_min, 2);
        assert_eq!(opts.k_max, 5);
        assert_eq!(opts.cpu_id, 3);
        assert_eq!(opts.ncpus, 8);
        assert_eq!(opts.metric, ErrorMetric::Ulp);
        assert_eq!(opts.compare, CompareMode::Equal);
    }

    #[test]
    fn test_record_serialization_shape() {
        let record = ResultRecord {
            target_id: None,
            target: None,
            k: 2,
            err: 1.0e-16,
            result: ResultTag::Intermediate,
            status: RunStatus::Running,
            cpu_id: 0,
            hamming: Some(0),
            rpn: "PI, SQR".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"K\":2"));
        assert!(json.contains("\"REL_ERR\""));
        assert!(json.contains("\"INTERMEDIATE\""));
        assert!(json.contains("\"HAMMING_DISTANCE\":0"));
        assert!(json.contains("\"RPN\":\"PI, SQR\""));
        assert!(!json.contains("target_id"));
    }
}
