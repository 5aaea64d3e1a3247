//! Output formatters for batch results

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::runner::{BatchResult, FileReport};

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire batch result
    fn format(&self, result: &BatchResult) -> String;

    /// Format a single file report
    fn format_report(&self, report: &FileReport) -> String;
}
