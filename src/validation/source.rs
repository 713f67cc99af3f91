//! Query file discovery
//!
//! Every `*.graphql` / `*.gql` file under the queries directory is one test
//! case, named by its file name. A sibling `.json` file with the same stem
//! supplies the variables for it.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::common::{Error, Result};

/// Extensions recognized as GraphQL query files
pub const QUERY_EXTENSIONS: &[&str] = &["graphql", "gql"];

/// Extension of the optional variables file next to a query
pub const VARIABLES_EXTENSION: &str = "json";

/// A query file loaded and ready to run
#[derive(Debug, Clone)]
pub struct QueryCase {
    pub query: String,
    pub variables: Value,
    /// Set when the variables came from a file
    pub variables_path: Option<PathBuf>,
}

/// Why a single query file could not be loaded
///
/// These fail only the query they belong to, never the whole run.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read query file: {0}")]
    ReadQuery(#[source] io::Error),

    #[error("Failed to read variables file: {0}")]
    ReadVariables(#[source] io::Error),

    #[error("Failed to parse variables file: {0}")]
    ParseVariables(String),
}

/// Summary of a query file for `list`
#[derive(Debug, Clone, Serialize)]
pub struct QueryInfo {
    pub name: String,
    pub path: String,
    pub has_variables: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables_file: Option<String>,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Whether a path has a query file extension
pub fn is_query_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| QUERY_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Test case name for a query file (its file name)
pub fn query_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Path where the variables for a query would live
pub fn variables_path_for(query: &Path) -> PathBuf {
    query.with_extension(VARIABLES_EXTENSION)
}

/// Find every query file under `dir`, in lexicographic path order
pub fn find_query_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::QueriesDirNotFound(dir.display().to_string()));
    }

    let scan_error = |error: String| Error::Scan {
        path: dir.display().to_string(),
        error,
    };

    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for ext in QUERY_EXTENSIONS {
        let pattern = format!("{}/**/*.{}", base, ext);
        let entries = glob::glob(&pattern).map_err(|e| scan_error(e.to_string()))?;
        for entry in entries {
            let path = entry.map_err(|e| scan_error(e.to_string()))?;
            if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    files.dedup();

    tracing::debug!(dir = %dir.display(), count = files.len(), "Discovered query files");
    Ok(files)
}

/// Read a query file and its variables
pub async fn load_case(path: &Path) -> std::result::Result<QueryCase, LoadError> {
    let query = tokio::fs::read_to_string(path)
        .await
        .map_err(LoadError::ReadQuery)?;

    let vars_path = variables_path_for(path);
    let (variables, variables_path) = if vars_path.is_file() {
        let content = tokio::fs::read_to_string(&vars_path)
            .await
            .map_err(LoadError::ReadVariables)?;
        (parse_variables(&content)?, Some(vars_path))
    } else {
        (Value::Object(Default::default()), None)
    };

    Ok(QueryCase {
        query,
        variables,
        variables_path,
    })
}

fn parse_variables(content: &str) -> std::result::Result<Value, LoadError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| LoadError::ParseVariables(e.to_string()))?;
    if !value.is_object() {
        return Err(LoadError::ParseVariables(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}

/// Describe a query file for listing
pub fn describe(path: &Path) -> Result<QueryInfo> {
    let metadata = std::fs::metadata(path).map_err(|e| Error::file_read(path, e))?;
    let vars_path = variables_path_for(path);
    let variables_file = vars_path
        .is_file()
        .then(|| vars_path.display().to_string());

    let description = std::fs::read_to_string(path)
        .ok()
        .and_then(|content| extract_description(&content));

    Ok(QueryInfo {
        name: query_name(path),
        path: path.display().to_string(),
        has_variables: variables_file.is_some(),
        variables_file,
        size_bytes: metadata.len(),
        description,
    })
}

/// First `#` comment in the leading comment block of a query
pub fn extract_description(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if let Some(comment) = line.strip_prefix('#') {
            let comment = comment.trim();
            if !comment.is_empty() {
                return Some(comment.to_string());
            }
        } else if !line.is_empty() {
            break;
        }
    }
    None
}
