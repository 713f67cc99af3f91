//! GraphQL-to-SQL engine interface
//!
//! The engine compiles a query against the live schema and executes it. It is a
//! black box to the validator: anything it rejects outright comes back as an
//! `Err`, anything it answers (even partially) comes back as an
//! [`ExecutionResult`].

mod database;
mod http;

pub use database::Database;
pub use http::HttpEngine;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::common::Result;

/// A compile/execute backend for GraphQL queries
#[async_trait]
pub trait Engine: Send + Sync {
    /// Compile and execute one query with its variables
    ///
    /// An `Err` is a hard failure of the call (compile error, transport error,
    /// unreadable response). Its message becomes the query's execution error.
    async fn execute(&self, query: &str, variables: &serde_json::Value) -> Result<ExecutionResult>;
}

/// A structured GraphQL error as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

impl GraphqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What the engine returned for a query that it did not reject outright
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    /// Top-level GraphQL errors, in response order
    pub errors: Vec<GraphqlError>,
    /// Raw `data` payload, undecoded
    pub data: Option<String>,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Box<RawValue>>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

impl ExecutionResult {
    /// Result with a data payload and no top-level errors
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            errors: Vec::new(),
            data: Some(data.into()),
        }
    }

    /// Decode a standard `{"data": ..., "errors": [...]}` response body
    ///
    /// The `data` member is kept as raw JSON text; it is only decoded when it
    /// is scanned for nested errors.
    pub fn from_response_body(body: &[u8]) -> Result<Self> {
        let response: GraphqlResponse = serde_json::from_slice(body)?;
        Ok(Self {
            errors: response.errors.unwrap_or_default(),
            data: response.data.map(|raw| raw.get().to_string()),
        })
    }
}
