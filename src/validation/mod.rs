//! Query validation
//!
//! Discovers query files, runs each through the engine once, scans the
//! responses for errors at any depth, and reports pass/fail per file.

pub mod report;
pub mod runner;
pub mod scanner;
pub mod source;

pub use report::{print_summary, OutputFormat};
pub use runner::{validate_file, validate_queries, RunOptions, ValidationOutcome, ValidationSummary};
pub use scanner::{collect_findings, decode_payload, scan, FieldPath, Finding, Segment};
