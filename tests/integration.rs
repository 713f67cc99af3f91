//! End-to-end tests for gql-validate
//!
//! The runner tests drive the library with an in-memory engine, so they need
//! no database. The binary tests only exercise commands and failure paths that
//! never reach a database.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gql_validate::common::{EXIT_OK, EXIT_SETUP_FAILED, EXIT_VALIDATION_FAILED};
use gql_validate::validation::{validate_file, validate_queries};
use gql_validate::{
    Engine, Error, ExecutionResult, GraphqlError, Result, RunOptions, ValidationSummary,
};

/// Canned engine response for one query text
#[derive(Clone)]
enum Reply {
    Data(&'static str),
    Errors(Vec<&'static str>, Option<&'static str>),
    Fail(&'static str),
    Slow(u64, &'static str),
}

/// Engine that answers from a table keyed by query text
#[derive(Default)]
struct MockEngine {
    replies: HashMap<String, Reply>,
    calls: AtomicUsize,
    seen_variables: std::sync::Mutex<Vec<serde_json::Value>>,
}

impl MockEngine {
    fn reply(mut self, query: &str, reply: Reply) -> Self {
        self.replies.insert(query.trim().to_string(), reply);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn execute(&self, query: &str, variables: &serde_json::Value) -> Result<ExecutionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_variables.lock().unwrap().push(variables.clone());

        match self.replies.get(query.trim()) {
            Some(Reply::Data(data)) => Ok(ExecutionResult::with_data(*data)),
            Some(Reply::Errors(messages, data)) => Ok(ExecutionResult {
                errors: messages.iter().map(|m| GraphqlError::new(*m)).collect(),
                data: data.map(str::to_string),
            }),
            Some(Reply::Fail(message)) => Err(Error::Engine(message.to_string())),
            Some(Reply::Slow(ms, data)) => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                Ok(ExecutionResult::with_data(*data))
            }
            None => Err(Error::Engine(format!("unexpected query: {}", query))),
        }
    }
}

/// Scratch queries directory
struct QueryDir {
    dir: tempfile::TempDir,
}

impl QueryDir {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn add(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write query file");
        path
    }

    fn files(&self) -> Vec<PathBuf> {
        gql_validate::validation::source::find_query_files(self.path())
            .expect("Failed to scan query dir")
    }
}

fn assert_summary_invariant(summary: &ValidationSummary) {
    assert_eq!(summary.total(), summary.results().len());
    assert_eq!(summary.passed() + summary.failed(), summary.total());
    assert_eq!(
        summary.passed(),
        summary.results().iter().filter(|r| r.passed()).count()
    );
}

// ============== Scenarios ==============

#[tokio::test]
async fn test_passing_query_without_variables_file() {
    let dir = QueryDir::new();
    let path = dir.add("users.graphql", "query { users { id } }");
    let engine = MockEngine::default().reply("query { users { id } }", Reply::Data(r#"{"users":[{"id":1}]}"#));

    let outcome = validate_file(&engine, &path).await;

    assert!(outcome.passed());
    assert!(outcome.errors().is_empty());
    assert_eq!(outcome.name(), "users.graphql");
    assert_eq!(engine.seen_variables.lock().unwrap()[0], serde_json::json!({}));
}

#[tokio::test]
async fn test_engine_failure_is_one_execution_error() {
    let dir = QueryDir::new();
    let path = dir.add("x.graphql", "query { x { id } }");
    let engine = MockEngine::default().reply("query { x { id } }", Reply::Fail("table not found: public.x"));

    let outcome = validate_file(&engine, &path).await;

    assert!(!outcome.passed());
    assert_eq!(
        outcome.errors(),
        &["Execution error: table not found: public.x".to_string()]
    );
}

#[tokio::test]
async fn test_nested_error_in_payload_fails_query() {
    let dir = QueryDir::new();
    let path = dir.add("posts.graphql", "query { posts { title } }");
    let engine = MockEngine::default().reply(
        "query { posts { title } }",
        Reply::Data(r#"{"posts":[{"title":"A"},{"error":"no access"}]}"#),
    );

    let outcome = validate_file(&engine, &path).await;

    assert!(!outcome.passed());
    assert_eq!(outcome.errors(), &["Error at posts[1]: no access".to_string()]);
}

#[tokio::test]
async fn test_structured_errors_then_nested_findings() {
    let dir = QueryDir::new();
    let path = dir.add("partial.graphql", "query { partial }");
    let engine = MockEngine::default().reply(
        "query { partial }",
        Reply::Errors(
            vec!["field 'secret' is blocked", "limit exceeded"],
            Some(r#"{"partial":{"errors":[{"message":"row 3 failed"}]}}"#),
        ),
    );

    let outcome = validate_file(&engine, &path).await;

    assert_eq!(
        outcome.errors(),
        &[
            "field 'secret' is blocked".to_string(),
            "limit exceeded".to_string(),
            "Error at partial[0]: row 3 failed".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_undecodable_payload_has_no_findings() {
    let dir = QueryDir::new();
    let path = dir.add("odd.graphql", "query { odd }");
    let engine = MockEngine::default().reply("query { odd }", Reply::Errors(vec![], Some("")));

    let outcome = validate_file(&engine, &path).await;
    assert!(outcome.passed());
}

#[tokio::test]
async fn test_variables_file_is_sent_to_engine() {
    let dir = QueryDir::new();
    let path = dir.add("user.graphql", "query($id: Int!) { user(id: $id) { id } }");
    dir.add("user.json", r#"{"id": 42}"#);
    let engine = MockEngine::default().reply(
        "query($id: Int!) { user(id: $id) { id } }",
        Reply::Data(r#"{"user":{"id":42}}"#),
    );

    let outcome = validate_file(&engine, &path).await;

    assert!(outcome.passed());
    assert_eq!(engine.seen_variables.lock().unwrap()[0], serde_json::json!({"id": 42}));
}

#[tokio::test]
async fn test_bad_variables_file_fails_only_that_query() {
    let dir = QueryDir::new();
    dir.add("a_bad.graphql", "query { a }");
    dir.add("a_bad.json", "{ nope");
    dir.add("b_good.graphql", "query { b }");
    let engine = MockEngine::default().reply("query { b }", Reply::Data(r#"{"b":1}"#));

    let summary = validate_queries(&engine, &dir.files(), &RunOptions::default()).await;

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.failed(), 1);
    assert!(summary.results()[0].errors()[0].starts_with("Failed to parse variables file: "));
    assert!(summary.results()[1].passed());
    // The engine is never called for a query that could not be loaded
    assert_eq!(engine.calls(), 1);
}

// ============== Runner ==============

#[tokio::test]
async fn test_each_query_runs_exactly_once_in_order() {
    let dir = QueryDir::new();
    dir.add("c.graphql", "query { c }");
    dir.add("a.graphql", "query { a }");
    dir.add("b.gql", "query { b }");
    let engine = MockEngine::default()
        .reply("query { a }", Reply::Data(r#"{"a":1}"#))
        .reply("query { b }", Reply::Fail("syntax error"))
        .reply("query { c }", Reply::Data(r#"{"c":{"error":{"message":"denied"}}}"#));

    let summary = validate_queries(&engine, &dir.files(), &RunOptions::default()).await;

    assert_eq!(engine.calls(), 3);
    let names: Vec<&str> = summary.results().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["a.graphql", "b.gql", "c.graphql"]);
    assert_eq!(summary.passed(), 1);
    assert_eq!(summary.failed(), 2);
    assert_eq!(summary.results()[2].errors(), &["Error at c: denied".to_string()]);
    assert_eq!(summary.exit_code(), EXIT_VALIDATION_FAILED);
    assert_summary_invariant(&summary);
}

#[tokio::test]
async fn test_fail_fast_stops_after_first_failure() {
    let dir = QueryDir::new();
    dir.add("a.graphql", "query { a }");
    dir.add("b.graphql", "query { b }");
    dir.add("c.graphql", "query { c }");
    let engine = MockEngine::default()
        .reply("query { a }", Reply::Data(r#"{"a":1}"#))
        .reply("query { b }", Reply::Fail("boom"))
        .reply("query { c }", Reply::Data(r#"{"c":1}"#));

    let options = RunOptions {
        fail_fast: true,
        jobs: 1,
    };
    let summary = validate_queries(&engine, &dir.files(), &options).await;

    assert_eq!(engine.calls(), 2);
    assert_eq!(summary.total(), 2);
    assert_eq!(summary.failed(), 1);
    assert_summary_invariant(&summary);
}

#[tokio::test]
async fn test_parallel_run_keeps_input_order() {
    let dir = QueryDir::new();
    dir.add("a.graphql", "query { a }");
    dir.add("b.graphql", "query { b }");
    dir.add("c.graphql", "query { c }");
    dir.add("d.graphql", "query { d }");
    let engine = MockEngine::default()
        .reply("query { a }", Reply::Slow(80, r#"{"a":1}"#))
        .reply("query { b }", Reply::Slow(40, r#"{"b":{"error":"late"}}"#))
        .reply("query { c }", Reply::Slow(5, r#"{"c":1}"#))
        .reply("query { d }", Reply::Slow(1, r#"{"d":1}"#));

    let options = RunOptions {
        fail_fast: false,
        jobs: 4,
    };
    let summary = validate_queries(&engine, &dir.files(), &options).await;

    let names: Vec<&str> = summary.results().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["a.graphql", "b.graphql", "c.graphql", "d.graphql"]);
    assert_eq!(summary.results()[1].errors(), &["Error at b: late".to_string()]);
    assert_eq!(engine.calls(), 4);
    assert_summary_invariant(&summary);
}

#[tokio::test]
async fn test_empty_run_passes() {
    let engine = MockEngine::default();
    let summary = validate_queries(&engine, &[], &RunOptions::default()).await;
    assert_eq!(summary.total(), 0);
    assert_eq!(summary.exit_code(), EXIT_OK);
    assert_summary_invariant(&summary);
}

#[tokio::test]
async fn test_outcome_verdict_matches_error_kinds() {
    let dir = QueryDir::new();
    dir.add("1_ok.graphql", "query { ok }");
    dir.add("2_exec.graphql", "query { exec }");
    dir.add("3_nested.graphql", "query { nested }");
    dir.add("4_both.graphql", "query { both }");
    let engine = MockEngine::default()
        .reply("query { ok }", Reply::Data(r#"{"ok":{"error":""}}"#))
        .reply("query { exec }", Reply::Fail("compile failed"))
        .reply("query { nested }", Reply::Data(r#"{"n":[{"errors":[{"message":"m"}]}]}"#))
        .reply(
            "query { both }",
            Reply::Errors(vec!["top"], Some(r#"{"x":{"error":"deep"}}"#)),
        );

    let summary = validate_queries(&engine, &dir.files(), &RunOptions::default()).await;

    for outcome in summary.results() {
        assert_eq!(outcome.passed(), outcome.errors().is_empty(), "{}", outcome.name());
    }
    let counts: Vec<usize> = summary.results().iter().map(|r| r.errors().len()).collect();
    assert_eq!(counts, vec![0, 1, 1, 2]);
    assert_summary_invariant(&summary);
}

// ============== Binary ==============

fn gql_validate(args: &[&str], cwd: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_gql-validate"))
        .args(args)
        .current_dir(cwd)
        .env_remove("DB_HOST")
        .env_remove("GQL_ENGINE_URL")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run gql-validate")
}

#[test]
fn test_init_then_list() {
    let tmp = tempfile::tempdir().unwrap();

    let output = gql_validate(&["init", "--dir", "project"], tmp.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Project initialized successfully!"));

    let project = tmp.path().join("project");
    assert!(project.join("config.yaml").is_file());
    assert!(project.join("queries/get_user_by_id.json").is_file());

    let output = gql_validate(&["list", "--json", "-q", "queries"], &project);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["total_files"], 2);
    assert_eq!(listing["queries"][0]["name"], "get_user_by_id.graphql");
    assert_eq!(listing["queries"][0]["has_variables"], true);
    assert_eq!(listing["queries"][1]["name"], "get_users.graphql");
    assert_eq!(listing["queries"][1]["has_variables"], false);
    assert_eq!(
        listing["queries"][1]["description"],
        "Sample query to fetch all users"
    );

    // Second init keeps what is there
    let output = gql_validate(&["init", "--dir", "project"], tmp.path());
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Skipped (exists)"));
}

#[test]
fn test_list_missing_directory_is_setup_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let output = gql_validate(&["list", "-q", "nowhere"], tmp.path());
    assert_eq!(output.status.code(), Some(EXIT_SETUP_FAILED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Queries directory not found"));
}

#[test]
fn test_validate_without_config_is_setup_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let output = gql_validate(&["validate", "-c", "missing.yaml"], tmp.path());
    assert_eq!(output.status.code(), Some(EXIT_SETUP_FAILED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not read config file"));
}

#[test]
fn test_validate_with_incomplete_config_is_setup_failure() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("config.yaml"), "database:\n  port: 5432\n").unwrap();

    let output = gql_validate(&["validate"], tmp.path());
    assert_eq!(output.status.code(), Some(EXIT_SETUP_FAILED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("database host is required"));
}

#[test]
fn test_validate_missing_query_file_is_setup_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let output = gql_validate(&["init"], tmp.path());
    assert!(output.status.success());

    let output = gql_validate(&["validate", "-f", "queries/nope.graphql"], tmp.path());
    assert_eq!(output.status.code(), Some(EXIT_SETUP_FAILED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Query file not found"));
}

#[test]
fn test_check_reports_missing_config() {
    let tmp = tempfile::tempdir().unwrap();
    let output = gql_validate(&["check", "--config", "absent.yaml"], tmp.path());
    assert_eq!(output.status.code(), Some(EXIT_SETUP_FAILED));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loading config from: absent.yaml"));
    assert!(stdout.contains("Failed to load config"));
}

#[test]
fn test_validate_without_queries_reports_empty_run() {
    let tmp = tempfile::tempdir().unwrap();
    let output = gql_validate(&["init"], tmp.path());
    assert!(output.status.success());
    fs::create_dir(tmp.path().join("empty")).unwrap();

    let output = gql_validate(&["validate", "--json", "-q", "empty"], tmp.path());
    assert_eq!(output.status.code(), Some(EXIT_OK), "{}", String::from_utf8_lossy(&output.stderr));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total"], 0);
    assert_eq!(summary["passed"], 0);
    assert_eq!(summary["failed"], 0);
    assert_eq!(summary["results"], serde_json::json!([]));

    let output = gql_validate(&["validate", "-q", "empty"], tmp.path());
    assert_eq!(output.status.code(), Some(EXIT_OK));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No query files found"));
}
