//! The search driver: exhaustive enumeration over skeletons and
//! assignments, best-state updates, and the streaming report.
//!
//! One call to [`run`] is one worker. The worker owns its shard of the
//! skeleton space (see [`crate::shard`]), its per-target state, and its
//! result stream; nothing is shared with other workers except the
//! read-only calculator. Execution is sequential and deterministic:
//! identical inputs produce byte-identical streams.

use crate::calc::Calculator;
use crate::eval::evaluate;
use crate::numeric::{compression_ratio, hamming_distance};
use crate::program::format_rpn;
use crate::score::{
    aggregate_error, contains_variable, improves, is_match, single_error, TargetState,
    FUNCTION_MATCH_THRESHOLD,
};
use crate::shard::shard_bounds;
use crate::skeleton::{self, Slot};
use crate::types::{
    DataPoint, Outcome, ResultRecord, ResultTag, RunStatus, SearchCounters, SearchMode,
    SearchOptions, SearchReport, MAX_CODE_LENGTH,
};

/// Early-abort heuristic: give up when, above this code length, ...
const ABORT_MIN_K: u32 = 4;
/// ... more than this many candidates were visited ...
const ABORT_MIN_VISITED: u64 = 250;
/// ... and almost none of them were syntactically valid.
const ABORT_MAX_VALID: u64 = 12;

/// Run one worker's search and produce its result stream.
///
/// Invalid parameters do not panic: they yield a well-formed FAILURE
/// report carrying a `diagnostic` message.
pub(crate) fn run(
    mode: SearchMode,
    data: &[DataPoint],
    calc: &Calculator,
    opts: &SearchOptions,
    num_to_find: i32,
) -> SearchReport {
    let effective_num = if mode == SearchMode::Function {
        1
    } else if num_to_find <= 0 {
        data.len()
    } else {
        num_to_find as usize
    };

    let mut engine = Engine {
        mode,
        data,
        calc,
        opts,
        num_to_find: effective_num,
        num_found: 0,
        stop: false,
        aborted: false,
        counters: SearchCounters::default(),
        targets: vec![TargetState::new(); data.len()],
        func_best: TargetState::new(),
        results: Vec::new(),
        truncated: false,
    };

    if let Some(diagnostic) = engine.validate() {
        return engine.finish(Some(diagnostic));
    }

    let mut slots = [Slot::Constant; MAX_CODE_LENGTH];
    let mut indices = [0usize; MAX_CODE_LENGTH];

    for k in opts.k_min..=opts.k_max {
        if engine.stop {
            break;
        }
        let k_len = k as usize;
        let n = skeleton::total_candidates(k);
        let (start, end) = shard_bounds(n, opts.cpu_id, opts.ncpus);
        skeleton::decode(start, &mut slots[..k_len]);

        for t in start..end {
            if engine.stop || engine.cancelled() {
                engine.stop = true;
                break;
            }
            engine.counters.total_ternary += 1;
            if skeleton::is_valid(&slots[..k_len]) {
                engine.counters.valid_ternary += 1;
                engine.assign(&slots[..k_len], &mut indices, 0);
            }
            if t + 1 < end {
                skeleton::increment(&mut slots[..k_len]);
            }
        }

        if !engine.stop && mode != SearchMode::Function {
            engine.emit_k_best(k);
        }

        if !engine.stop
            && engine.counters.valid_ternary <= ABORT_MAX_VALID
            && engine.counters.total_ternary > ABORT_MIN_VISITED
            && k > ABORT_MIN_K
        {
            engine.abort(k);
            break;
        }
    }

    engine.finish(None)
}

struct Engine<'a> {
    mode: SearchMode,
    data: &'a [DataPoint],
    calc: &'a Calculator,
    opts: &'a SearchOptions,
    num_to_find: usize,
    num_found: usize,
    stop: bool,
    aborted: bool,
    counters: SearchCounters,
    targets: Vec<TargetState>,
    func_best: TargetState,
    results: Vec<ResultRecord>,
    truncated: bool,
}

impl Engine<'_> {
    fn validate(&self) -> Option<String> {
        let o = self.opts;
        if self.data.is_empty() {
            return Some("no data points supplied".to_string());
        }
        if o.k_min < 1 || o.k_min > o.k_max || o.k_max as usize > MAX_CODE_LENGTH {
            return Some(format!(
                "invalid code length range: minK={}, maxK={} (need 1 <= minK <= maxK <= {})",
                o.k_min, o.k_max, MAX_CODE_LENGTH
            ));
        }
        if o.ncpus < 1 || o.cpu_id >= o.ncpus {
            return Some(format!(
                "invalid shard: cpuId={}, ncpus={}",
                o.cpu_id, o.ncpus
            ));
        }
        None
    }

    fn cancelled(&self) -> bool {
        self.opts
            .cancel
            .as_ref()
            .map_or(false, |token| token.is_cancelled())
    }

    /// Depth-first assignment enumeration over one valid skeleton.
    fn assign(&mut self, slots: &[Slot], indices: &mut [usize; MAX_CODE_LENGTH], pos: usize) {
        if self.stop {
            return;
        }
        if pos == slots.len() {
            self.counters.evaluations += 1;
            match self.mode {
                SearchMode::Function => self.score_function(slots, &indices[..slots.len()]),
                SearchMode::Constant | SearchMode::Batch => {
                    self.score_targets(slots, &indices[..slots.len()]);
                }
            }
            return;
        }
        let n_options = match slots[pos] {
            Slot::Constant => {
                if self.mode == SearchMode::Function {
                    self.calc.n_const() + 1
                } else {
                    self.calc.n_const()
                }
            }
            Slot::Unary => self.calc.n_unary(),
            Slot::Binary => self.calc.n_binary(),
        };
        for i in 0..n_options {
            indices[pos] = i;
            self.assign(slots, indices, pos + 1);
            if self.stop {
                return;
            }
        }
    }

    /// Function mode: one formula against all data points.
    fn score_function(&mut self, slots: &[Slot], indices: &[usize]) {
        if !contains_variable(slots, indices) {
            return;
        }
        let err = aggregate_error(slots, indices, self.calc, self.data, self.opts.metric);
        if !improves(err, self.func_best.best_err, self.opts.compare) {
            return;
        }
        let value = evaluate(slots, indices, self.calc, SearchMode::Function, self.data[0].x);
        self.func_best.record(slots, indices, err, value);
        let rpn = format_rpn(slots, indices, self.calc, SearchMode::Function);
        self.push_record(ResultRecord {
            target_id: None,
            target: None,
            k: slots.len() as u32,
            err,
            result: ResultTag::Intermediate,
            status: RunStatus::Running,
            cpu_id: self.opts.cpu_id,
            hamming: None,
            rpn,
        });
        if err < FUNCTION_MATCH_THRESHOLD {
            self.func_best.found = true;
            self.num_found = 1;
            self.stop = true;
        }
    }

    /// Constant/batch mode: one value checked against every unfound target.
    fn score_targets(&mut self, slots: &[Slot], indices: &[usize]) {
        let computed = evaluate(slots, indices, self.calc, SearchMode::Constant, 0.0);
        if !computed.is_finite() {
            return;
        }
        for t in 0..self.data.len() {
            if self.targets[t].found {
                continue;
            }
            let target = self.data[t].y;
            let delta = self.data[t].dy;
            let err = single_error(computed, target, self.opts.metric);
            if improves(err, self.targets[t].best_err, self.opts.compare) {
                self.targets[t].record(slots, indices, err, computed);
                let rpn = format_rpn(slots, indices, self.calc, SearchMode::Constant);
                self.push_record(ResultRecord {
                    target_id: None,
                    target: None,
                    k: slots.len() as u32,
                    err,
                    result: ResultTag::Intermediate,
                    status: RunStatus::Running,
                    cpu_id: self.opts.cpu_id,
                    hamming: Some(hamming_distance(target, computed)),
                    rpn,
                });
            }
            if is_match(
                err,
                computed,
                target,
                delta,
                slots.len() as u32,
                self.calc.n_total(),
            ) {
                self.targets[t].found = true;
                self.num_found += 1;
                if self.data.len() > 1 {
                    let rpn = format_rpn(slots, indices, self.calc, SearchMode::Constant);
                    self.push_record(ResultRecord {
                        target_id: Some(self.data[t].x),
                        target: Some(target),
                        k: slots.len() as u32,
                        err,
                        result: ResultTag::Success,
                        status: RunStatus::Running,
                        cpu_id: self.opts.cpu_id,
                        hamming: Some(hamming_distance(target, computed)),
                        rpn,
                    });
                }
                if self.num_found >= self.num_to_find {
                    self.stop = true;
                    return;
                }
                // One formula matches one target, so several formulas can
                // be collected for equal target values.
                break;
            }
        }
    }

    /// Milestone records after exhausting one code length.
    fn emit_k_best(&mut self, k: u32) {
        for t in 0..self.data.len() {
            if self.targets[t].found || !self.targets[t].has_best() {
                continue;
            }
            let rpn = format_rpn(
                self.targets[t].skeleton(),
                self.targets[t].indices(),
                self.calc,
                SearchMode::Constant,
            );
            self.push_record(ResultRecord {
                target_id: None,
                target: None,
                k,
                err: self.targets[t].best_err,
                result: ResultTag::KBest,
                status: RunStatus::Running,
                cpu_id: self.opts.cpu_id,
                hamming: Some(hamming_distance(self.data[t].y, self.targets[t].best_value)),
                rpn,
            });
        }
    }

    /// The shard turned out pathologically sparse; stop and say so.
    fn abort(&mut self, k: u32) {
        self.stop = true;
        self.aborted = true;
        let best = if self.mode == SearchMode::Function {
            &self.func_best
        } else {
            &self.targets[0]
        };
        let (err, rpn) = if best.has_best() {
            (
                best.best_err,
                format_rpn(best.skeleton(), best.indices(), self.calc, self.mode_label()),
            )
        } else {
            (f64::MAX, String::new())
        };
        self.push_record(ResultRecord {
            target_id: None,
            target: None,
            k,
            err,
            result: ResultTag::Aborted,
            status: RunStatus::Running,
            cpu_id: self.opts.cpu_id,
            hamming: None,
            rpn,
        });
    }

    fn push_record(&mut self, record: ResultRecord) {
        if self.results.len() >= self.opts.max_records {
            self.truncated = true;
            return;
        }
        self.results.push(record);
    }

    fn mode_label(&self) -> SearchMode {
        match self.mode {
            SearchMode::Function => SearchMode::Function,
            _ if self.data.len() == 1 => SearchMode::Constant,
            _ => SearchMode::Batch,
        }
    }

    fn outcome(&self) -> Outcome {
        if self.num_found >= self.num_to_find {
            Outcome::Success
        } else if self.aborted {
            Outcome::Aborted
        } else if self.num_found > 0 {
            Outcome::Partial
        } else {
            Outcome::Failure
        }
    }

    /// Assemble the terminal report. `diagnostic` is set when validation
    /// rejected the search before it ran.
    fn finish(mut self, diagnostic: Option<String>) -> SearchReport {
        let (target0, delta0) = self
            .data
            .first()
            .map_or((0.0, 0.0), |point| (point.y, point.dy));

        // Final best approximations for targets that were never matched.
        if diagnostic.is_none() && self.mode != SearchMode::Function && self.data.len() > 1 {
            for t in 0..self.data.len() {
                if self.targets[t].found || !self.targets[t].has_best() {
                    continue;
                }
                let rpn = format_rpn(
                    self.targets[t].skeleton(),
                    self.targets[t].indices(),
                    self.calc,
                    SearchMode::Constant,
                );
                self.push_record(ResultRecord {
                    target_id: Some(self.data[t].x),
                    target: Some(self.data[t].y),
                    k: self.targets[t].best_k as u32,
                    err: self.targets[t].best_err,
                    result: ResultTag::Best,
                    status: RunStatus::Finished,
                    cpu_id: self.opts.cpu_id,
                    hamming: Some(hamming_distance(
                        self.data[t].y,
                        self.targets[t].best_value,
                    )),
                    rpn,
                });
            }
        }

        let function_mode = self.mode == SearchMode::Function;
        let mode_label = self.mode_label();
        let best = if function_mode || self.targets.is_empty() {
            &self.func_best
        } else {
            &self.targets[0]
        };

        let rpn = if best.has_best() {
            format_rpn(best.skeleton(), best.indices(), self.calc, mode_label)
        } else {
            String::new()
        };
        let best_err = best.best_err;
        let best_k = best.best_k as u32;
        let hamming = (!function_mode && best.has_best())
            .then(|| hamming_distance(target0, best.best_value));

        let outcome = if diagnostic.is_some() {
            Outcome::Failure
        } else if function_mode {
            if self.func_best.found {
                Outcome::Success
            } else if self.aborted {
                Outcome::Aborted
            } else {
                Outcome::Failure
            }
        } else {
            self.outcome()
        };

        let num_not_found = self.targets.iter().filter(|t| !t.found).count();
        let n_total = self.calc.n_total();
        let compression = (!function_mode)
            .then(|| compression_ratio(best_err, target0, best_k, n_total));

        SearchReport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            arch: std::env::consts::ARCH.to_string(),
            os: std::env::consts::OS.to_string(),
            mode: mode_label,
            metric: self.opts.metric,
            compare: self.opts.compare,
            n_data: self.data.len(),
            target: target0,
            delta: delta0,
            num_to_find: self.num_to_find,
            cpu_id: self.opts.cpu_id,
            ncpus: self.opts.ncpus,
            min_k: self.opts.k_min,
            max_k: self.opts.k_max,
            n_const: self.calc.n_const(),
            n_unary: self.calc.n_unary(),
            n_binary: self.calc.n_binary(),
            n_total,
            results: self.results,
            result: outcome,
            rpn,
            err: best_err,
            input_abs_err: (!function_mode).then_some(delta0),
            compression_ratio: compression,
            k: best_k,
            status: RunStatus::Finished,
            hamming,
            num_found: (!function_mode).then_some(self.num_found),
            num_not_found: (!function_mode).then_some(num_not_found),
            total_ternary: self.counters.total_ternary,
            valid_ternary: self.counters.valid_ternary,
            evaluations: self.counters.evaluations,
            diagnostic,
            truncated: self.truncated,
        }
    }
}
