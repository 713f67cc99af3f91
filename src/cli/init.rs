//! Project scaffolding for `gql-validate init`

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::common::{Error, Result};

/// What happened to one scaffolded path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitAction {
    CreatedDir(PathBuf),
    Created(PathBuf),
    Skipped(PathBuf),
}

/// Outcome of scaffolding a project
#[derive(Debug, Default)]
pub struct InitReport {
    pub actions: Vec<InitAction>,
}

impl InitReport {
    /// Print each action followed by next steps
    pub fn print(&self) {
        for action in &self.actions {
            match action {
                InitAction::CreatedDir(path) => {
                    println!("  {} Created directory: {}", "✓".green(), path.display())
                }
                InitAction::Created(path) => {
                    println!("  {} Created: {}", "✓".green(), path.display())
                }
                InitAction::Skipped(path) => {
                    println!("  {} Skipped (exists): {}", "○".dimmed(), path.display())
                }
            }
        }

        println!();
        println!("{}", "Project initialized successfully!".green().bold());
        println!();
        println!("Next steps:");
        println!("  1. Edit config.yaml with your database credentials and engine URL");
        println!("     Or set environment variables: DB_HOST, DB_NAME, DB_USER, DB_PASSWORD, GQL_ENGINE_URL");
        println!();
        println!("  2. Check your database connection:");
        println!("     gql-validate check");
        println!();
        println!("  3. Add your GraphQL queries to the queries/ directory");
        println!();
        println!("  4. Run validation:");
        println!("     gql-validate validate");
        println!();
    }
}

/// Scaffold a project in `dir`
///
/// Existing files are left alone unless `overwrite` is set.
pub fn init_project(dir: &Path, overwrite: bool) -> Result<InitReport> {
    let mut report = InitReport::default();

    let queries_dir = dir.join("queries");
    std::fs::create_dir_all(&queries_dir).map_err(|e| Error::FileWrite {
        path: queries_dir.display().to_string(),
        error: format!("failed to create queries directory: {}", e),
    })?;
    report.actions.push(InitAction::CreatedDir(queries_dir.clone()));

    let files = [
        (dir.join("config.yaml"), SAMPLE_CONFIG),
        (dir.join(".env.example"), SAMPLE_ENV),
        (queries_dir.join("get_users.graphql"), SAMPLE_QUERY),
        (queries_dir.join("get_user_by_id.graphql"), SAMPLE_QUERY_WITH_VARS),
        (queries_dir.join("get_user_by_id.json"), SAMPLE_VARS),
        (dir.join(".gitignore"), SAMPLE_GITIGNORE),
    ];

    for (path, content) in files {
        report.actions.push(write_file_if_absent(path, content, overwrite)?);
    }

    Ok(report)
}

fn write_file_if_absent(path: PathBuf, content: &str, overwrite: bool) -> Result<InitAction> {
    if path.exists() && !overwrite {
        tracing::debug!(path = %path.display(), "Keeping existing file");
        return Ok(InitAction::Skipped(path));
    }

    std::fs::write(&path, content).map_err(|e| Error::file_write(&path, e))?;
    Ok(InitAction::Created(path))
}

const SAMPLE_CONFIG: &str = r#"# GraphQL Validation Tool Configuration
# Database credentials can be overridden with environment variables:
# DB_HOST, DB_PORT, DB_NAME, DB_USER, DB_PASSWORD, DB_SSLMODE
# The engine URL can be overridden with GQL_ENGINE_URL

database:
  type: "postgres"
  host: "localhost"
  port: 5432
  dbname: "your_database"
  user: "your_user"
  password: "your_password"
  sslmode: "disable"

# GraphQL-to-SQL engine that compiles and executes the queries
engine:
  url: "http://localhost:8080/api/v1/graphql"
  headers: {}
"#;

const SAMPLE_ENV: &str = r#"# Database Configuration
# Copy this file to .env and fill in your values
# Then run: source .env

export DB_HOST=localhost
export DB_PORT=5432
export DB_NAME=your_database
export DB_USER=your_user
export DB_PASSWORD=your_password
export DB_SSLMODE=disable
export GQL_ENGINE_URL=http://localhost:8080/api/v1/graphql
"#;

const SAMPLE_QUERY: &str = r#"# Sample query to fetch all users
# Modify this to match your database schema

query GetUsers {
  users {
    id
    name
    email
    created_at
  }
}
"#;

const SAMPLE_QUERY_WITH_VARS: &str = r#"# Sample query with variables
# Variables are provided in the corresponding .json file

query GetUserById($id: Int!) {
  users(where: { id: { eq: $id } }) {
    id
    name
    email
    created_at
  }
}
"#;

const SAMPLE_VARS: &str = r#"{
  "id": 1
}
"#;

const SAMPLE_GITIGNORE: &str = r#"# Environment files with secrets
.env

# Binary
gql-validate

# OS files
.DS_Store
Thumbs.db

# IDE
.idea/
.vscode/
*.swp
*.swo
"#;
