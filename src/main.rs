//! Reflow CLI - batch responsive retrofit for markup files
//!
//! Expands glob patterns, runs the rewrite pipeline over each file, and
//! writes changed documents back in place. Exit code is 0 when every file
//! was processed, 1 when at least one file failed, 2 on usage errors.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use glob::glob;
use reflow::output::{JsonFormatter, OutputFormatter, TextFormatter};
use reflow::rules::responsive_pipeline;
use reflow::runner::{Runner, WriteMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reflow",
    version,
    about = "Idempotent responsive retrofit for admin markup pages",
    long_about = "Applies a fixed, ordered set of guarded rewrite rules to each file. \
Already-migrated files are left untouched, so the tool is safe to re-run."
)]
struct Cli {
    /// Files or glob patterns to migrate
    files: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Compute changes without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show a unified diff of the changes instead of writing
    #[arg(long, conflicts_with = "dry_run")]
    diff: bool,

    /// Process files in parallel with N jobs (0 = auto); default is sequential
    #[arg(short, long)]
    jobs: Option<usize>,

    /// List the built-in rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Show which rules fired per file
    #[arg(short, long)]
    verbose: bool,

    /// Suppress per-file progress lines
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Expand glob patterns into an ordered list of existing files.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths =
            glob(pattern).with_context(|| format!("invalid pattern '{}'", pattern))?;
        for entry in paths.flatten() {
            if entry.is_file() {
                files.push(entry);
            }
        }
    }
    Ok(files)
}

fn run(cli: Cli) -> Result<i32> {
    let pipeline = responsive_pipeline();

    if cli.list_rules {
        println!("{}", "Available rules:".bold());
        println!();
        for rule in pipeline.rules() {
            println!("  {} - {}", rule.name.cyan(), rule.description);
        }
        println!();
        return Ok(0);
    }

    if cli.files.is_empty() {
        eprintln!("{}: No files specified", "error".red().bold());
        eprintln!();
        eprintln!("Usage: reflow [OPTIONS] <FILES>...");
        eprintln!();
        eprintln!("For more information, try '--help'");
        return Ok(2);
    }

    let files = expand_patterns(&cli.files)?;
    if files.is_empty() {
        eprintln!("{}: No files found to migrate", "error".red().bold());
        return Ok(1);
    }

    // Keep stdout parseable in json mode; the banner is text-only chatter
    if cli.format == Format::Text && !cli.quiet {
        println!("Found {} files.", files.len());
    }

    let mode = if cli.diff {
        WriteMode::Diff
    } else if cli.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Apply
    };

    // Progress lines only make sense sequentially and in text mode
    let sequential = cli.jobs.is_none();
    let stream_progress =
        sequential && !cli.quiet && !cli.verbose && cli.format == Format::Text;

    let mut runner = Runner::new(pipeline)
        .with_mode(mode)
        .with_progress(stream_progress);
    if let Some(jobs) = cli.jobs {
        runner = runner.with_parallel(jobs);
    }

    let result = runner.run(&files);

    match cli.format {
        Format::Text => {
            let mut formatter = TextFormatter::new();
            if cli.no_color {
                formatter = formatter.without_color();
            }
            if stream_progress || cli.quiet {
                formatter = formatter.summary_only();
            }
            if cli.verbose {
                formatter = formatter.with_applied_rules();
            }
            print!("{}", formatter.format(&result));
        }
        Format::Json => {
            println!("{}", JsonFormatter::new().pretty().format(&result));
        }
    }

    Ok(result.exit_code())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(2);
        }
    }
}
