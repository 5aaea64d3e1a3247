//! Reflow - idempotent batch retrofitter for markup files
//!
//! Applies an ordered set of guard-checked rewrite rules to each document
//! independently, retrofitting a batch of admin HTML pages with responsive
//! layout changes. Re-running over already-migrated documents is a no-op.
//!
//! # Architecture
//!
//! ```text
//! CLI -> Runner -> Pipeline -> Rule (Guard + Matcher + Transform)
//! ```
//!
//! The pipeline is a pure function from document text to document text:
//! every rule decides whether it already applied (guard), where to match
//! (literal first, pattern fallback), and how to rewrite or inject. The
//! runner layers file enumeration, write-back, and reporting on top, with
//! per-file failure isolation.
//!
//! There is no DOM or AST: rules work on raw text with patterns specific
//! enough not to land on unrelated markup.

pub mod matcher;
pub mod output;
pub mod pipeline;
pub mod rule;
pub mod rules;
pub mod runner;

// Re-export main types
pub use matcher::{Matcher, Span};
pub use output::{JsonFormatter, OutputFormatter, TextFormatter};
pub use pipeline::{Pipeline, TransformationResult};
pub use rule::{Guard, Rule, Transform};
pub use rules::{responsive_pipeline, responsive_rules};
pub use runner::{BatchResult, FileReport, FileStatus, Runner, RunnerError, WriteMode};
