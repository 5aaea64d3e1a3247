//! Batch runner: enumerate, transform, persist, report
//!
//! The runner is the I/O boundary around the pure pipeline. It reads each
//! document, runs the pipeline, and writes the result back only when the
//! text actually changed. Failures are isolated per file: an unreadable or
//! unwritable document is recorded as a failed report and the batch
//! continues, surfacing a non-zero exit code at the end.
//!
//! Documents are independent, so the batch may run in parallel; the
//! default is sequential for deterministic, ordered progress lines.

use crate::pipeline::{Pipeline, TransformationResult};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Per-file I/O failure.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// What to do with a changed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write the transformed text back to the file
    #[default]
    Apply,
    /// Compute and report, but never write
    DryRun,
    /// Compute a unified diff instead of writing
    Diff,
}

/// Outcome category for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Pipeline changed the document (written back unless dry-run/diff)
    Updated,
    /// Pipeline left the document as-is
    Unchanged,
    /// The file could not be read or written
    Failed,
}

/// Report for one processed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// File path
    pub path: PathBuf,

    /// Outcome category
    pub status: FileStatus,

    /// Rules that fired, in application order
    pub applied: Vec<&'static str>,

    /// Error message for failed files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Unified diff (diff mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileReport {
    fn from_result(path: &Path, result: &TransformationResult) -> Self {
        Self {
            path: path.to_path_buf(),
            status: if result.changed {
                FileStatus::Updated
            } else {
                FileStatus::Unchanged
            },
            applied: result.applied.clone(),
            error: None,
            diff: None,
        }
    }

    fn failed(path: &Path, error: &RunnerError) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Failed,
            applied: Vec::new(),
            error: Some(error.to_string()),
            diff: None,
        }
    }
}

/// Result of processing a whole batch.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Per-file reports, in input order
    pub reports: Vec<FileReport>,

    /// Wall-clock time for the batch
    pub duration: Duration,
}

impl BatchResult {
    pub fn files_processed(&self) -> usize {
        self.reports.len()
    }

    pub fn updated_count(&self) -> usize {
        self.count(FileStatus::Updated)
    }

    pub fn unchanged_count(&self) -> usize {
        self.count(FileStatus::Unchanged)
    }

    pub fn failed_count(&self) -> usize {
        self.count(FileStatus::Failed)
    }

    fn count(&self, status: FileStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    /// Exit code: 0 when every file was processed, 1 when at least one
    /// file failed. Unchanged files are a success, not a failure.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

/// Applies the pipeline to a batch of files.
pub struct Runner {
    pipeline: Pipeline,
    mode: WriteMode,
    /// Process files in parallel (progress lines are then deferred to the
    /// formatter, which serializes output)
    parallel: bool,
    /// Worker threads when parallel (0 = auto)
    jobs: usize,
    /// Print per-file progress lines while processing sequentially
    progress: bool,
}

impl Runner {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            mode: WriteMode::Apply,
            parallel: false,
            jobs: 0,
            progress: false,
        }
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_parallel(mut self, jobs: usize) -> Self {
        self.parallel = true;
        self.jobs = jobs;
        self
    }

    /// Stream `Processing <file>...` / outcome lines while running
    /// sequentially. Ignored in parallel mode.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Process one file, isolating I/O failures into the report.
    pub fn process_file(&self, path: &Path) -> FileReport {
        match self.try_process(path) {
            Ok(report) => report,
            Err(e) => {
                log::warn!("{}", e);
                FileReport::failed(path, &e)
            }
        }
    }

    fn try_process(&self, path: &Path) -> Result<FileReport, RunnerError> {
        let original = std::fs::read_to_string(path).map_err(|source| RunnerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let result = self.pipeline.run(&original);
        let mut report = FileReport::from_result(path, &result);

        if result.changed {
            match self.mode {
                WriteMode::Apply => {
                    std::fs::write(path, &result.text).map_err(|source| RunnerError::Write {
                        path: path.to_path_buf(),
                        source,
                    })?;
                }
                WriteMode::Diff => {
                    report.diff = Some(unified_diff(path, &original, &result.text));
                }
                WriteMode::DryRun => {}
            }
        }

        Ok(report)
    }

    /// Process the whole batch. Reports come back in input order in both
    /// modes; parallel runs only reorder the work, not the results.
    pub fn run(&self, files: &[PathBuf]) -> BatchResult {
        let start = Instant::now();

        let reports: Vec<FileReport> = if self.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(if self.jobs > 0 {
                    self.jobs
                } else {
                    num_cpus::get()
                })
                .build()
                .unwrap_or_else(|_| {
                    rayon::ThreadPoolBuilder::new()
                        .build()
                        .expect("default thread pool")
                });

            pool.install(|| files.par_iter().map(|f| self.process_file(f)).collect())
        } else {
            files
                .iter()
                .map(|f| {
                    if self.progress {
                        println!("Processing {}...", f.display());
                    }
                    let report = self.process_file(f);
                    if self.progress {
                        print_outcome(&report);
                    }
                    report
                })
                .collect()
        };

        BatchResult {
            reports,
            duration: start.elapsed(),
        }
    }
}

/// One status line per file, colored by outcome.
pub fn print_outcome(report: &FileReport) {
    match report.status {
        FileStatus::Updated => {
            println!("{} {}", "Updated".green(), report.path.display());
        }
        FileStatus::Unchanged => {
            println!("No changes for {}", report.path.display());
        }
        FileStatus::Failed => {
            println!(
                "{} {}: {}",
                "Failed".red().bold(),
                report.path.display(),
                report.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

/// Minimal unified diff between two document versions. Line-by-line
/// pairing, one hunk; good enough for eyeballing a migration.
fn unified_diff(path: &Path, original: &str, modified: &str) -> String {
    let old_lines: Vec<&str> = original.lines().collect();
    let new_lines: Vec<&str> = modified.lines().collect();

    let mut diff = String::new();
    diff.push_str(&format!("--- a/{}\n", path.display()));
    diff.push_str(&format!("+++ b/{}\n", path.display()));
    diff.push_str(&format!(
        "@@ -1,{} +1,{} @@\n",
        old_lines.len(),
        new_lines.len()
    ));

    let max_len = old_lines.len().max(new_lines.len());
    for i in 0..max_len {
        match (old_lines.get(i), new_lines.get(i)) {
            (Some(o), Some(n)) if o == n => {
                diff.push_str(&format!(" {}\n", o));
            }
            (Some(o), Some(n)) => {
                diff.push_str(&format!("-{}\n", o));
                diff.push_str(&format!("+{}\n", n));
            }
            (Some(o), None) => {
                diff.push_str(&format!("-{}\n", o));
            }
            (None, Some(n)) => {
                diff.push_str(&format!("+{}\n", n));
            }
            (None, None) => {}
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::responsive_pipeline;
    use std::fs;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html>
<body>
    <div class="flex-1 overflow-y-auto p-8">
        <h2 class="text-lg font-bold text-slate-800">Reports</h2>
    </div>
</body>
</html>
"#;

    fn write_page(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, PAGE).unwrap();
        path
    }

    #[test]
    fn test_apply_writes_back_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_page(&dir, "reports.html");
        let runner = Runner::new(responsive_pipeline());

        let report = runner.process_file(&path);
        assert_eq!(report.status, FileStatus::Updated);
        assert!(report.applied.contains(&"content-padding"));

        let migrated = fs::read_to_string(&path).unwrap();
        assert!(migrated.contains("p-4 md:p-8"));

        // Second pass over the written file changes nothing
        let second = runner.process_file(&path);
        assert_eq!(second.status, FileStatus::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), migrated);
    }

    #[test]
    fn test_dry_run_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write_page(&dir, "reports.html");
        let runner = Runner::new(responsive_pipeline()).with_mode(WriteMode::DryRun);

        let report = runner.process_file(&path);
        assert_eq!(report.status, FileStatus::Updated);
        assert_eq!(fs::read_to_string(&path).unwrap(), PAGE);
    }

    #[test]
    fn test_diff_mode_produces_diff_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = write_page(&dir, "reports.html");
        let runner = Runner::new(responsive_pipeline()).with_mode(WriteMode::Diff);
        assert_eq!(runner.mode(), WriteMode::Diff);

        let report = runner.process_file(&path);
        let diff = report.diff.unwrap();
        assert!(diff.contains("--- a/"));
        assert!(diff.contains("+++ b/"));
        assert!(diff.contains("+"));
        assert_eq!(fs::read_to_string(&path).unwrap(), PAGE);
    }

    #[test]
    fn test_missing_file_is_isolated() {
        let dir = TempDir::new().unwrap();
        let good = write_page(&dir, "good.html");
        let missing = dir.path().join("missing.html");
        let runner = Runner::new(responsive_pipeline());

        let result = runner.run(&[missing.clone(), good.clone()]);

        assert_eq!(result.files_processed(), 2);
        assert_eq!(result.failed_count(), 1);
        assert_eq!(result.updated_count(), 1);
        assert_eq!(result.exit_code(), 1);

        // The failure did not stop the good file from being migrated
        assert!(fs::read_to_string(&good).unwrap().contains("p-4 md:p-8"));
        assert_eq!(result.reports[0].status, FileStatus::Failed);
        assert!(result.reports[0].error.as_deref().unwrap().contains("read"));
    }

    #[test]
    fn test_clean_batch_exit_code() {
        let dir = TempDir::new().unwrap();
        let path = write_page(&dir, "reports.html");
        let runner = Runner::new(responsive_pipeline());

        let result = runner.run(&[path]);
        assert_eq!(result.exit_code(), 0);
        assert!(!result.has_failures());
        assert_eq!(result.unchanged_count(), 0);
    }

    #[test]
    fn test_parallel_preserves_input_order() {
        let dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..8)
            .map(|i| write_page(&dir, &format!("page{}.html", i)))
            .collect();

        let runner = Runner::new(responsive_pipeline()).with_parallel(2);
        let result = runner.run(&files);

        assert_eq!(result.files_processed(), 8);
        for (report, path) in result.reports.iter().zip(&files) {
            assert_eq!(&report.path, path);
        }
    }

    #[test]
    fn test_unified_diff_shape() {
        let diff = unified_diff(Path::new("x.html"), "a\nb\nc\n", "a\nB\nc\n");
        assert!(diff.contains("--- a/x.html"));
        assert!(diff.contains("-b"));
        assert!(diff.contains("+B"));
        assert!(diff.contains(" a"));
    }
}
