//! Result rendering
//!
//! Human-readable table or a JSON document mirroring [`ValidationSummary`].

use std::io::{self, Write};

use colored::Colorize;

use super::runner::ValidationSummary;
use crate::common::Result;

const RULE_WIDTH: usize = 66;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Print a summary to stdout
pub fn print_summary(summary: &ValidationSummary, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => write_json(summary, &mut out),
        OutputFormat::Text => Ok(write_text(summary, &mut out)?),
    }
}

/// Write the summary as pretty-printed JSON
pub fn write_json<W: Write>(summary: &ValidationSummary, out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)?;
    Ok(())
}

/// Write the summary as an aligned text table
pub fn write_text<W: Write>(summary: &ValidationSummary, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "╔{}╗", "═".repeat(RULE_WIDTH - 4))?;
    writeln!(out, "║{:^width$}║", "GraphQL Query Validation Results", width = RULE_WIDTH - 4)?;
    writeln!(out, "╚{}╝", "═".repeat(RULE_WIDTH - 4))?;
    writeln!(out)?;

    for result in summary.results() {
        let label = if result.passed() {
            format!("{} {}", "✓".green(), "PASS".green().bold())
        } else {
            format!("{} {}", "✗".red(), "FAIL".red().bold())
        };
        writeln!(
            out,
            "  {}  {:<40} {:>4}ms",
            label,
            result.name(),
            result.duration_ms()
        )?;
        for error in result.errors() {
            writeln!(out, "          └─ {}", error)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", "─".repeat(RULE_WIDTH))?;

    if summary.failed() == 0 {
        writeln!(
            out,
            "  {} All {} queries passed validation",
            "✓".green(),
            summary.total()
        )?;
    } else {
        writeln!(
            out,
            "  Summary: {} total, {} passed, {} failed",
            summary.total(),
            summary.passed().to_string().green(),
            summary.failed().to_string().red()
        )?;
    }
    writeln!(out)?;

    Ok(())
}
