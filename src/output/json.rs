//! JSON output formatter

use super::OutputFormatter;
use crate::runner::{BatchResult, FileReport};
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    files: &'a [FileReport],
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    files_processed: usize,
    updated: usize,
    unchanged: usize,
    failed: usize,
    duration_ms: u128,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &BatchResult) -> String {
        let output = JsonOutput {
            files: &result.reports,
            summary: JsonSummary {
                files_processed: result.files_processed(),
                updated: result.updated_count(),
                unchanged: result.unchanged_count(),
                failed: result.failed_count(),
                duration_ms: result.duration.as_millis(),
            },
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_default()
        } else {
            serde_json::to_string(&output).unwrap_or_default()
        }
    }

    fn format_report(&self, report: &FileReport) -> String {
        if self.pretty {
            serde_json::to_string_pretty(report).unwrap_or_default()
        } else {
            serde_json::to_string(report).unwrap_or_default()
        }
    }
}
