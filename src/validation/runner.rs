//! Validation runner
//!
//! Runs each query file through the engine exactly once and turns the response
//! into a [`ValidationOutcome`]. No retries: one invocation is the verdict for
//! the run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use futures_util::stream::{self, StreamExt};
use serde::Serialize;

use super::scanner::{decode_payload, scan};
use super::source::{load_case, query_name};
use crate::common::{EXIT_OK, EXIT_VALIDATION_FAILED};
use crate::engine::Engine;

/// Verdict for one query file
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    name: String,
    path: String,
    passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
    duration_ms: u64,
}

impl ValidationOutcome {
    /// Build an outcome; it passes iff there are no error messages
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        errors: Vec<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            passed: errors.is_empty(),
            errors,
            duration_ms,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

/// Totals over a run, derived from its outcomes
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    total: usize,
    passed: usize,
    failed: usize,
    results: Vec<ValidationOutcome>,
}

impl ValidationSummary {
    pub fn from_outcomes(results: Vec<ValidationOutcome>) -> Self {
        let passed = results.iter().filter(|r| r.passed()).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            results,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn results(&self) -> &[ValidationOutcome] {
        &self.results
    }

    /// `0` when nothing failed, `1` otherwise
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 {
            EXIT_OK
        } else {
            EXIT_VALIDATION_FAILED
        }
    }
}

/// Options controlling a validation run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop starting new queries once one has failed
    pub fail_fast: bool,
    /// Maximum number of queries in flight; 1 runs them one after another
    pub jobs: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fail_fast: false,
            jobs: 1,
        }
    }
}

/// Validate a single query file
pub async fn validate_file(engine: &dyn Engine, path: &Path) -> ValidationOutcome {
    let start = Instant::now();
    let name = query_name(path);
    let display_path = path.display().to_string();

    tracing::debug!(query = %name, "Validating");

    let case = match load_case(path).await {
        Ok(case) => case,
        Err(e) => {
            let errors = vec![e.to_string()];
            return ValidationOutcome::new(name, display_path, errors, elapsed_ms(start));
        }
    };

    if let Some(vars) = &case.variables_path {
        tracing::debug!(query = %name, variables = %vars.display(), "Using variables file");
    }

    let response = engine.execute(&case.query, &case.variables).await;
    let duration_ms = elapsed_ms(start);

    let errors = match &response {
        Ok(result) => {
            let data = result
                .data
                .as_deref()
                .and_then(|raw| decode_payload(raw.as_bytes()));
            scan(None, Some(result.errors.as_slice()), data.as_ref())
        }
        Err(e) => scan(Some(&e.to_string()), None, None),
    };

    tracing::debug!(
        query = %name,
        passed = errors.is_empty(),
        errors = errors.len(),
        duration_ms,
        "Validated"
    );

    ValidationOutcome::new(name, display_path, errors, duration_ms)
}

/// Validate every file and summarize
///
/// Results keep the order of `files` regardless of `jobs`. With `fail_fast`,
/// queries not yet started when a failure is observed are skipped and do not
/// appear in the summary.
pub async fn validate_queries(
    engine: &dyn Engine,
    files: &[PathBuf],
    options: &RunOptions,
) -> ValidationSummary {
    let jobs = options.jobs.max(1);
    let stop = AtomicBool::new(false);
    let stop = &stop;

    let outcomes: Vec<Option<ValidationOutcome>> = stream::iter(files)
        .map(move |path| async move {
            if stop.load(Ordering::SeqCst) {
                tracing::debug!(query = %path.display(), "Skipped after earlier failure");
                return None;
            }
            let outcome = validate_file(engine, path).await;
            if options.fail_fast && !outcome.passed() {
                stop.store(true, Ordering::SeqCst);
            }
            Some(outcome)
        })
        .buffered(jobs)
        .collect()
        .await;

    ValidationSummary::from_outcomes(outcomes.into_iter().flatten().collect())
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
