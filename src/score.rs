//! Candidate scoring, the match criterion, and per-target best state.
//!
//! The scorer turns an evaluated candidate into an error under the active
//! metric, decides whether it improves on the best seen so far, and
//! decides when a target counts as matched.

use crate::calc::Calculator;
use crate::eval::evaluate;
use crate::numeric::{hamming_distance, ulp_distance};
use crate::skeleton::Slot;
use crate::types::{CompareMode, DataPoint, ErrorMetric, SearchMode, MAX_CODE_LENGTH};

/// Exact-match threshold: 16 machine epsilons.
pub const MATCH_EPSILON: f64 = 16.0 * f64::EPSILON;

/// Aggregate-error threshold below which a function search succeeds.
pub const FUNCTION_MATCH_THRESHOLD: f64 = 1.0e-12;

/// Minimum compression ratio for the tolerance-based match branch.
pub const MIN_COMPRESSION: f64 = 1.05;

/// Aggregate-error penalty for a non-finite evaluation at one sample.
const NON_FINITE_PENALTY: f64 = 1.0e10;

/// Error of a single computed value against a single target.
///
/// Non-finite values score `f64::MAX` (worse than anything finite). The
/// data-set metrics (MSE, MAE, MAX) degrade to the absolute error when
/// applied to a single point.
pub fn single_error(computed: f64, target: f64, metric: ErrorMetric) -> f64 {
    if !computed.is_finite() {
        return f64::MAX;
    }
    match metric {
        ErrorMetric::Rel => {
            if target == 0.0 {
                computed.abs()
            } else {
                (computed / target - 1.0).abs()
            }
        }
        ErrorMetric::Ulp => ulp_distance(target, computed) as f64,
        ErrorMetric::Hamming => f64::from(hamming_distance(target, computed)),
        ErrorMetric::Abs | ErrorMetric::Mse | ErrorMetric::Mae | ErrorMetric::Max => {
            (computed - target).abs()
        }
    }
}

/// Aggregate error of one formula over a tabulated data set (function
/// mode): the candidate is evaluated at every sample's `x` and the
/// pointwise errors combine per the metric. A non-finite evaluation adds
/// a large flat penalty instead of poisoning the aggregate.
pub fn aggregate_error(
    skeleton: &[Slot],
    indices: &[usize],
    calc: &Calculator,
    data: &[DataPoint],
    metric: ErrorMetric,
) -> f64 {
    if data.is_empty() {
        return f64::MAX;
    }
    let mut error = 0.0;
    let mut max_err = 0.0f64;
    for point in data {
        let computed = evaluate(skeleton, indices, calc, SearchMode::Function, point.x);
        if !computed.is_finite() {
            error += NON_FINITE_PENALTY;
            continue;
        }
        let diff = computed - point.y;
        let abs_diff = diff.abs();
        match metric {
            ErrorMetric::Mse => error += diff * diff,
            ErrorMetric::Max => max_err = max_err.max(abs_diff),
            ErrorMetric::Rel => {
                error += if point.y == 0.0 {
                    abs_diff
                } else {
                    (computed / point.y - 1.0).abs()
                };
            }
            ErrorMetric::Mae | ErrorMetric::Abs | ErrorMetric::Ulp | ErrorMetric::Hamming => {
                error += abs_diff;
            }
        }
    }
    if metric == ErrorMetric::Max {
        max_err
    } else {
        error / data.len() as f64
    }
}

/// Whether an error improves on the current best under the compare mode.
pub fn improves(err: f64, best: f64, compare: CompareMode) -> bool {
    match compare {
        CompareMode::Strict => err < best,
        CompareMode::Equal => err <= best,
    }
}

/// The constant/batch match criterion.
///
/// A target is matched when the error is within 16 machine epsilons, or —
/// given a declared tolerance — when the computed value lands within
/// twice that tolerance *and* the expression is at least modestly
/// compressive (shorter than the digits it reproduces).
pub fn is_match(
    err: f64,
    computed: f64,
    target: f64,
    delta: f64,
    k: u32,
    n_total: usize,
) -> bool {
    if err <= MATCH_EPSILON {
        return true;
    }
    if delta > 0.0 {
        let compression = if err > 0.0 {
            -err.log10() / (f64::from(k) * (n_total as f64).log10())
        } else {
            10.0
        };
        if (computed - target).abs() <= 2.0 * delta && compression >= MIN_COMPRESSION {
            return true;
        }
    }
    false
}

/// Whether any constant slot of an assignment is bound to the variable.
pub fn contains_variable(skeleton: &[Slot], indices: &[usize]) -> bool {
    skeleton
        .iter()
        .zip(indices)
        .any(|(slot, &idx)| *slot == Slot::Constant && idx == 0)
}

/// Best-known expression for one target.
///
/// Buffers are fixed-size and reused; `best_k == 0` means nothing has
/// been recorded yet.
#[derive(Debug, Clone)]
pub struct TargetState {
    /// Whether the match criterion has fired for this target.
    pub found: bool,
    /// Lowest error seen so far (`f64::MAX` initially).
    pub best_err: f64,
    /// Value of the best expression.
    pub best_value: f64,
    /// Code length of the best expression; 0 = none recorded.
    pub best_k: usize,
    skeleton: [Slot; MAX_CODE_LENGTH],
    indices: [usize; MAX_CODE_LENGTH],
}

impl Default for TargetState {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetState {
    /// Fresh state with no best recorded.
    pub fn new() -> Self {
        Self {
            found: false,
            best_err: f64::MAX,
            best_value: f64::NAN,
            best_k: 0,
            skeleton: [Slot::Constant; MAX_CODE_LENGTH],
            indices: [0; MAX_CODE_LENGTH],
        }
    }

    /// Record a new best expression.
    pub fn record(&mut self, skeleton: &[Slot], indices: &[usize], err: f64, value: f64) {
        let k = skeleton.len();
        self.best_err = err;
        self.best_value = value;
        self.best_k = k;
        self.skeleton[..k].copy_from_slice(skeleton);
        self.indices[..k].copy_from_slice(&indices[..k]);
    }

    /// Whether a best expression has been recorded.
    pub fn has_best(&self) -> bool {
        self.best_k > 0
    }

    /// Skeleton of the best expression.
    pub fn skeleton(&self) -> &[Slot] {
        &self.skeleton[..self.best_k]
    }

    /// Assignment of the best expression.
    pub fn indices(&self) -> &[usize] {
        &self.indices[..self.best_k]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::calc4;

    #[test]
    fn test_single_error_metrics() {
        assert_eq!(single_error(3.0, 2.0, ErrorMetric::Abs), 1.0);
        assert_eq!(single_error(3.0, 2.0, ErrorMetric::Rel), 0.5);
        // REL falls back to the absolute form at target zero.
        assert_eq!(single_error(0.25, 0.0, ErrorMetric::Rel), 0.25);
        assert_eq!(single_error(1.0, 1.0, ErrorMetric::Ulp), 0.0);
        assert_eq!(single_error(1.0, -1.0, ErrorMetric::Hamming), 1.0);
        // Single-point MSE/MAE/MAX degrade to ABS.
        assert_eq!(single_error(3.0, 2.0, ErrorMetric::Mse), 1.0);
    }

    #[test]
    fn test_single_error_non_finite() {
        assert_eq!(single_error(f64::NAN, 1.0, ErrorMetric::Rel), f64::MAX);
        assert_eq!(single_error(f64::INFINITY, 1.0, ErrorMetric::Abs), f64::MAX);
    }

    #[test]
    fn test_improves() {
        assert!(improves(1.0, 2.0, CompareMode::Strict));
        assert!(!improves(2.0, 2.0, CompareMode::Strict));
        assert!(improves(2.0, 2.0, CompareMode::Equal));
        assert!(!improves(3.0, 2.0, CompareMode::Equal));
    }

    #[test]
    fn test_exact_match_branch() {
        assert!(is_match(0.0, 1.0, 1.0, 0.0, 3, 36));
        assert!(is_match(MATCH_EPSILON, 1.0, 1.0, 0.0, 3, 36));
        assert!(!is_match(1.0e-10, 1.0, 1.0, 0.0, 3, 36));
    }

    #[test]
    fn test_tolerance_match_branch() {
        // PI against 3.1416 with delta = 1e-4: rel err ~2.3e-6, one symbol
        // over 36 buttons -> compression ~3.6, well above the cutoff.
        let computed = std::f64::consts::PI;
        let target = 3.1416;
        let err = (computed / target - 1.0).abs();
        assert!(is_match(err, computed, target, 1.0e-4, 1, 36));

        // Same error, but burned into a K = 10 program: no longer
        // compressive enough.
        assert!(!is_match(err, computed, target, 1.0e-4, 10, 36));

        // Outside 2*delta: rejected regardless of compression.
        assert!(!is_match(err, computed, target, 1.0e-7, 1, 36));
    }

    #[test]
    fn test_aggregate_error_exact_fit() {
        // "x, EXP" over exp samples: exactly zero MSE.
        let data: Vec<DataPoint> = (0..4)
            .map(|i| DataPoint::sample(f64::from(i), f64::from(i).exp()))
            .collect();
        let skeleton = [Slot::Constant, Slot::Unary];
        let indices = [0, calc4().lookup_unary("EXP").unwrap()];
        let err = aggregate_error(&skeleton, &indices, calc4(), &data, ErrorMetric::Mse);
        assert_eq!(err, 0.0);
    }

    #[test]
    fn test_aggregate_error_penalizes_non_finite() {
        // "x, LOG" at x = 0 diverges; the penalty dominates.
        let data = vec![DataPoint::sample(0.0, 0.0), DataPoint::sample(1.0, 0.0)];
        let skeleton = [Slot::Constant, Slot::Unary];
        let indices = [0, calc4().lookup_unary("LOG").unwrap()];
        let err = aggregate_error(&skeleton, &indices, calc4(), &data, ErrorMetric::Mse);
        assert!(err > 1.0e9);
    }

    #[test]
    fn test_aggregate_error_max_metric() {
        // "x, SQR" against y = x^2 + offset: MAX picks the worst point.
        let data = vec![
            DataPoint::sample(1.0, 1.5),
            DataPoint::sample(2.0, 4.25),
            DataPoint::sample(3.0, 9.0),
        ];
        let skeleton = [Slot::Constant, Slot::Unary];
        let indices = [0, calc4().lookup_unary("SQR").unwrap()];
        let err = aggregate_error(&skeleton, &indices, calc4(), &data, ErrorMetric::Max);
        assert_eq!(err, 0.5);
    }

    #[test]
    fn test_contains_variable() {
        let skeleton = [Slot::Constant, Slot::Unary];
        assert!(contains_variable(&skeleton, &[0, 3]));
        assert!(!contains_variable(&skeleton, &[2, 3]));
    }

    #[test]
    fn test_target_state_record() {
        let mut state = TargetState::new();
        assert!(!state.has_best());
        let skeleton = [Slot::Constant, Slot::Unary];
        state.record(&skeleton, &[0, 5], 1.0e-3, 9.87);
        assert!(state.has_best());
        assert_eq!(state.best_k, 2);
        assert_eq!(state.skeleton(), &skeleton);
        assert_eq!(state.indices(), &[0, 5]);
    }
}
