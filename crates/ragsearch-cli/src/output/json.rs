//! JSON output

use ragsearch_core::ProcessedResult;

pub fn format_results(results: &[ProcessedResult]) -> String {
    let mut out = serde_json::to_string_pretty(results).unwrap_or_else(|_| "[]".to_string());
    out.push('\n');
    out
}
