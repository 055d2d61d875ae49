//! Terminal output

use ragsearch_core::{display_score, ProcessedResult};
use std::fmt::Write;

pub fn format_results(results: &[ProcessedResult]) -> String {
    let mut out = String::new();

    if let Some(first) = results.first() {
        let total_generation_ms: u64 = results.iter().map(|r| r.generation_ms).sum();
        let _ = writeln!(
            out,
            "Query response time: {}ms | Generation time: {}ms",
            first.search_ms, total_generation_ms
        );
        let _ = writeln!(out);
    }

    for (idx, result) in results.iter().enumerate() {
        let _ = writeln!(out, "[{}] {}", idx + 1, result.title);
        let _ = writeln!(out, "    {}", result.url);
        let _ = writeln!(out, "    AI answer: {}", result.answer);
        let _ = writeln!(out, "    Score: {}", display_score(result.score));
        let _ = writeln!(out, "    Excerpt: {}", result.first_passage);
        let _ = writeln!(out);
    }

    out
}
