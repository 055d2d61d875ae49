//! Output formatters

pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use ragsearch_core::ProcessedResult;

/// Format processed results
pub fn format_results(results: &[ProcessedResult], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json::format_results(results),
        OutputFormat::Cli => terminal::format_results(results),
    }
}
