//! WebAssembly bindings for browser workers.
//!
//! A browser host spawns one web worker per shard and hands each one its
//! `cpu_id`/`ncpus` pair; every call returns the complete JSON result
//! stream as a string. Built with `--features wasm` as a `cdylib`.

use crate::calc::calc4;
use crate::formatter::{JsonFormatter, ReportFormatter};
use crate::types::SearchOptions;
use wasm_bindgen::prelude::*;

/// Constant recognition over the full CALC4 calculator.
///
/// Returns the JSON result stream.
#[wasm_bindgen]
pub fn search_rpn(z: f64, dz: f64, min_k: u32, max_k: u32, cpu_id: u32, ncpus: u32) -> String {
    let opts = SearchOptions::new()
        .with_k_range(min_k, max_k)
        .with_shard(cpu_id, ncpus);
    let report = crate::search_constant(z, dz, calc4(), &opts);
    JsonFormatter::compact().format_report(&report)
}

/// Constant recognition over a named subset of CALC4.
///
/// Each list is comma-separated operator names; `None` keeps the whole
/// table and an empty string empties the category. Returns the JSON
/// result stream, or a one-field error document when the sub-calculator
/// cannot be built.
#[wasm_bindgen]
pub fn search_rpn_custom(
    z: f64,
    dz: f64,
    min_k: u32,
    max_k: u32,
    cpu_id: u32,
    ncpus: u32,
    consts: Option<String>,
    funcs: Option<String>,
    ops: Option<String>,
) -> String {
    let calculator = match calc4().subset(consts.as_deref(), funcs.as_deref(), ops.as_deref()) {
        Ok(calculator) => calculator,
        Err(e) => return format!("{{\"error\":\"{e}\"}}"),
    };
    let opts = SearchOptions::new()
        .with_k_range(min_k, max_k)
        .with_shard(cpu_id, ncpus);
    let report = crate::search_constant(z, dz, &calculator, &opts);
    JsonFormatter::compact().format_report(&report)
}
