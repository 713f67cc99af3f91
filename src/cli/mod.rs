//! CLI command handling
//!
//! Dispatches CLI commands and formats their output. Every handler returns the
//! process exit status on success; errors are setup failures.

mod init;

use std::path::{Path, PathBuf};
use std::time::Instant;

use colored::Colorize;

use crate::commands::{Commands, GlobalArgs};
use crate::common::config::Config;
use crate::common::{truncate, Error, Result, EXIT_OK};
use crate::engine::{Database, HttpEngine};
use crate::validation::source::{self, QueryInfo};
use crate::validation::{
    print_summary, validate_queries, OutputFormat, RunOptions, ValidationSummary,
};

pub use init::{init_project, InitAction, InitReport};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, global: &GlobalArgs) -> Result<i32> {
    match command {
        Commands::Validate {
            queries,
            file,
            fail_fast,
            jobs,
        } => {
            let options = RunOptions {
                fail_fast,
                jobs: usize::from(jobs),
            };
            run_validate(global, &queries, file.as_deref(), &options).await
        }

        Commands::List { queries, full_path } => run_list(global, &queries, full_path),

        Commands::Check => run_check(global).await,

        Commands::Init { dir, overwrite } => {
            println!("Initializing GraphQL validation project in: {}\n", dir.display());
            let report = init_project(&dir, overwrite)?;
            report.print();
            Ok(EXIT_OK)
        }
    }
}

/// Resolve the list of query files to validate
fn resolve_query_files(queries: &Path, file: Option<&Path>) -> Result<Vec<PathBuf>> {
    match file {
        Some(file) => {
            if !file.is_file() {
                return Err(Error::QueryFileNotFound(file.display().to_string()));
            }
            if !source::is_query_file(file) {
                tracing::warn!(
                    file = %file.display(),
                    "File does not have a .graphql or .gql extension"
                );
            }
            Ok(vec![file.to_path_buf()])
        }
        None => source::find_query_files(queries),
    }
}

async fn run_validate(
    global: &GlobalArgs,
    queries: &Path,
    file: Option<&Path>,
    options: &RunOptions,
) -> Result<i32> {
    let config = Config::load(&global.config)?;
    config.validate()?;

    let files = resolve_query_files(queries, file)?;
    if files.is_empty() {
        if global.json {
            let summary = ValidationSummary::from_outcomes(Vec::new());
            print_summary(&summary, OutputFormat::Json)?;
        } else {
            println!("No query files found");
        }
        return Ok(EXIT_OK);
    }

    let db = Database::connect(&config.database).await?;
    tracing::info!(
        host = %config.database.host,
        dbname = %config.database.dbname,
        "Connected to database"
    );
    let engine = HttpEngine::new(&config.engine)?;

    if global.verbose && !global.json {
        println!("Found {} query file(s) to validate\n", files.len());
    }

    tracing::info!(
        queries = files.len(),
        jobs = options.jobs,
        engine = engine.url(),
        "Running validation"
    );
    let summary = validate_queries(&engine, &files, options).await;
    db.close().await;

    print_summary(&summary, OutputFormat::from_json_flag(global.json))?;

    if summary.failed() > 0 {
        tracing::info!("{} validation(s) failed", summary.failed());
    }
    Ok(summary.exit_code())
}

fn run_list(global: &GlobalArgs, queries: &Path, full_path: bool) -> Result<i32> {
    let infos = source::find_query_files(queries)?
        .iter()
        .map(|path| source::describe(path))
        .collect::<Result<Vec<QueryInfo>>>()?;

    if infos.is_empty() {
        println!("No GraphQL query files found in: {}", queries.display());
        return Ok(EXIT_OK);
    }

    if global.json {
        let output = serde_json::json!({
            "directory": queries.display().to_string(),
            "total_files": infos.len(),
            "queries": infos,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(EXIT_OK);
    }

    println!();
    println!("GraphQL Queries in: {}", queries.display());
    println!("{}", "═".repeat(63));
    println!();

    for (i, info) in infos.iter().enumerate() {
        let display_path = if full_path { &info.path } else { &info.name };
        println!("  {}. {}", i + 1, display_path.bold());

        if let Some(description) = &info.description {
            println!("     │ {}", description.dimmed());
        }

        if let Some(vars) = &info.variables_file {
            let vars_display = if full_path {
                vars.clone()
            } else {
                Path::new(vars)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| vars.clone())
            };
            println!("     └─ Variables: {}", vars_display);
        }

        if global.verbose {
            println!("     └─ Size: {} bytes", info.size_bytes);
        }

        println!();
    }

    println!("Total: {} query file(s)", infos.len());
    let with_vars = infos.iter().filter(|q| q.has_variables).count();
    if with_vars > 0 {
        println!("       {} with variables file(s)", with_vars);
    }
    println!();

    Ok(EXIT_OK)
}

/// Report a failed check step and pass the error through
fn check_failed(step: &str, e: Error) -> Error {
    println!("  {} {}: {}", "✗".red(), step, e);
    e
}

async fn run_check(global: &GlobalArgs) -> Result<i32> {
    println!("Checking configuration and database connection...");
    println!();

    println!("  {} Loading config from: {}", "○".dimmed(), global.config.display());
    let config =
        Config::load(&global.config).map_err(|e| check_failed("Failed to load config", e))?;
    println!("  {} Config loaded successfully", "✓".green());

    println!("  {} Validating configuration...", "○".dimmed());
    config
        .validate()
        .map_err(|e| check_failed("Invalid configuration", e))?;
    println!("  {} Configuration is valid", "✓".green());

    if global.verbose {
        let db = &config.database;
        println!();
        println!("  Connection Details:");
        println!("    Host:     {}", db.host);
        println!("    Port:     {}", db.port);
        println!("    Database: {}", db.dbname);
        println!("    User:     {}", db.user);
        println!("    SSL Mode: {}", db.sslmode);
        println!("    Engine:   {}", config.engine.url);
        println!();
    }

    println!("  {} Connecting to database...", "○".dimmed());
    let start = Instant::now();
    let db = Database::connect(&config.database)
        .await
        .map_err(|e| check_failed("Failed to connect to database", e))?;
    println!(
        "  {} Database connection successful ({}ms)",
        "✓".green(),
        start.elapsed().as_millis()
    );

    if global.verbose {
        match db.server_version().await {
            Ok(version) => println!(
                "  {} Database version: {}",
                "✓".green(),
                truncate(&version, 60)
            ),
            Err(e) => tracing::debug!(error = %e, "Could not read server version"),
        }
    }

    match db.public_table_count().await {
        Ok(count) => println!("  {} Found {} table(s) in public schema", "✓".green(), count),
        Err(e) => tracing::debug!(error = %e, "Could not count tables"),
    }

    db.close().await;

    println!();
    println!("All checks passed! Your configuration is ready to use.");
    println!();

    Ok(EXIT_OK)
}
