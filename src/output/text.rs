//! Human-readable text output formatter

use super::OutputFormatter;
use crate::runner::{BatchResult, FileReport, FileStatus};
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Repeat per-file status lines (off when the runner already
    /// streamed them as progress)
    pub show_files: bool,

    /// Show which rules fired per file
    pub show_applied: bool,

    /// Show diffs collected in diff mode
    pub show_diffs: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_files: true,
            show_applied: false,
            show_diffs: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Skip per-file lines (already printed as progress)
    pub fn summary_only(mut self) -> Self {
        self.show_files = false;
        self
    }

    /// Include the list of fired rules per file
    pub fn with_applied_rules(mut self) -> Self {
        self.show_applied = true;
        self
    }

    fn status_line(&self, report: &FileReport) -> String {
        match report.status {
            FileStatus::Updated => format!(
                "{} {}",
                if self.colored {
                    "Updated".green().to_string()
                } else {
                    "Updated".to_string()
                },
                report.path.display()
            ),
            FileStatus::Unchanged => format!("No changes for {}", report.path.display()),
            FileStatus::Failed => format!(
                "{} {}: {}",
                if self.colored {
                    "Failed".red().bold().to_string()
                } else {
                    "Failed".to_string()
                },
                report.path.display(),
                report.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &BatchResult) -> String {
        let mut output = String::new();

        if self.show_files {
            for report in &result.reports {
                output.push_str(&self.format_report(report));
            }
            if !result.reports.is_empty() {
                output.push('\n');
            }
        }

        if self.show_diffs {
            for report in &result.reports {
                if let Some(diff) = &report.diff {
                    output.push_str(diff);
                    output.push('\n');
                }
            }
        }

        // Summary line
        output.push_str(&format!(
            "{} {} processed: {} updated, {} unchanged",
            result.files_processed(),
            if result.files_processed() == 1 {
                "file"
            } else {
                "files"
            },
            result.updated_count(),
            result.unchanged_count(),
        ));

        if result.failed_count() > 0 {
            let failed = format!("{} failed", result.failed_count());
            output.push_str(&format!(
                ", {}",
                if self.colored {
                    failed.red().to_string()
                } else {
                    failed
                }
            ));
        }
        output.push('\n');

        output.push_str(&format!(
            "Finished in {:.2}s\n",
            result.duration.as_secs_f64()
        ));

        output
    }

    fn format_report(&self, report: &FileReport) -> String {
        let mut output = String::new();
        output.push_str(&self.status_line(report));
        output.push('\n');

        if self.show_applied && !report.applied.is_empty() {
            output.push_str(&format!("  rules: {}\n", report.applied.join(", ")));
        }

        output
    }
}
