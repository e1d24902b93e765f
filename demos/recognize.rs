//! Recognize a handful of famous constants and print the result streams.
//!
//! ```bash
//! cargo run --example recognize
//! ```

use vsearch::{calc, search_constant, HumanFormatter, ReportFormatter, SearchOptions};

fn main() {
    let targets = [
        ("pi^2", 9.869604401089358, 0.0),
        ("golden ratio", 1.6180339887498949, 0.0),
        ("pi, four digits", 3.1416, 1.0e-4),
        ("fine structure ~1/137", 0.0072973525693, 0.0),
    ];

    let opts = SearchOptions::new().with_k_range(1, 4);
    let formatter = HumanFormatter::new();

    for (label, target, delta) in targets {
        println!("=== {label} ===");
        let report = search_constant(target, delta, calc::calc4(), &opts);
        print!("{}", formatter.format_report(&report));
        println!();
    }
}
