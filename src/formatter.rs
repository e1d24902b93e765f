//! Output formatters for search reports.
//!
//! This module provides trait-based formatters for rendering a
//! [`SearchReport`] in various output formats (JSON, human-readable).
//! The JSON document is the engine's canonical stream shape; the human
//! formatter is a convenience for terminals.

use crate::types::{ResultTag, SearchReport};

/// Trait for rendering search reports.
pub trait ReportFormatter {
    /// Render the complete report.
    fn format_report(&self, report: &SearchReport) -> String;
}

/// JSON output formatter.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormatter {
    /// Create a new JSON formatter with pretty printing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compact JSON formatter.
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &SearchReport) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }
}

/// Human-readable output formatter.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    /// Show every streamed record, not just the summary.
    pub verbose: bool,
    /// Quiet mode (single summary line).
    pub quiet: bool,
}

impl HumanFormatter {
    /// Create a new human formatter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            quiet: false,
        }
    }

    /// Create a quiet formatter.
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
        }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format_report(&self, report: &SearchReport) -> String {
        if self.quiet {
            return format!("{}\t{}\t{:e}\n", report.result, report.rpn, report.err);
        }

        let mut s = String::new();
        s.push_str(&format!(
            "Search: {} target {} (delta {})\n",
            report.mode, report.target, report.delta
        ));
        s.push_str(&format!(
            "  Metric:     {} ({})\n",
            report.metric, report.compare
        ));
        s.push_str(&format!(
            "  Shard:      worker {} of {}\n",
            report.cpu_id, report.ncpus
        ));
        s.push_str(&format!(
            "  Lengths:    K {}..{}\n",
            report.min_k, report.max_k
        ));
        s.push_str(&format!(
            "  Calculator: {} constants, {} unary, {} binary ({} total)\n",
            report.n_const, report.n_unary, report.n_binary, report.n_total
        ));

        if self.verbose {
            for record in &report.results {
                let tag = match record.result {
                    ResultTag::Intermediate => "intermediate",
                    ResultTag::KBest => "k-best",
                    ResultTag::Success => "success",
                    ResultTag::Best => "best",
                    ResultTag::Aborted => "aborted",
                    ResultTag::Failure => "failure",
                };
                s.push_str(&format!(
                    "  [{:12}] K={} err={:.5e} {}\n",
                    tag, record.k, record.err, record.rpn
                ));
            }
        } else {
            s.push_str(&format!("  Records:    {}\n", report.results.len()));
        }

        s.push_str(&format!("Result: {}\n", report.result));
        if !report.rpn.is_empty() {
            s.push_str(&format!("  RPN:        {}\n", report.rpn));
            s.push_str(&format!("  Error:      {:.5e}\n", report.err));
            s.push_str(&format!("  K:          {}\n", report.k));
        }
        if let Some(ratio) = report.compression_ratio {
            s.push_str(&format!("  Compression: {ratio:.3}\n"));
        }
        if let Some(diagnostic) = &report.diagnostic {
            s.push_str(&format!("  Diagnostic: {diagnostic}\n"));
        }
        s.push_str(&format!(
            "  Counters:   {} visited, {} valid, {} evaluations\n",
            report.total_ternary, report.valid_ternary, report.evaluations
        ));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::calc4;
    use crate::types::SearchOptions;

    fn sample_report() -> SearchReport {
        crate::search_constant(
            9.869_604_401_089_358,
            0.0,
            calc4(),
            &SearchOptions::new().with_k_range(1, 4),
        )
    }

    #[test]
    fn test_json_formatter() {
        let report = sample_report();
        let json = JsonFormatter::new().format_report(&report);
        assert!(json.contains("\"RPN\": \"PI, SQR\""));
        assert!(json.contains("\"result\": \"SUCCESS\""));

        let compact = JsonFormatter::compact().format_report(&report);
        assert!(compact.contains("\"RPN\":\"PI, SQR\""));
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_json_round_trips() {
        let report = sample_report();
        let json = JsonFormatter::compact().format_report(&report);
        let parsed: SearchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.rpn, report.rpn);
        assert_eq!(parsed.results.len(), report.results.len());
    }

    #[test]
    fn test_human_formatter() {
        let report = sample_report();
        let text = HumanFormatter::new().format_report(&report);
        assert!(text.contains("Result: SUCCESS"));
        assert!(text.contains("PI, SQR"));
        assert!(text.contains("worker 0 of 1"));
    }

    #[test]
    fn test_human_formatter_verbose_lists_records() {
        let report = sample_report();
        let text = HumanFormatter::verbose().format_report(&report);
        assert!(text.contains("[intermediate"));
    }

    #[test]
    fn test_human_formatter_quiet() {
        let report = sample_report();
        let text = HumanFormatter::quiet().format_report(&report);
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("SUCCESS"));
    }
}
