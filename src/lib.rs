//! gql-validate - GraphQL query validation against a live database
//!
//! This library runs a directory of GraphQL queries through a GraphQL-to-SQL
//! engine and reports every error it finds, including errors nested anywhere
//! inside the returned data.

pub mod cli;
pub mod commands;
pub mod common;
pub mod engine;
pub mod validation;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use engine::{Engine, ExecutionResult, GraphqlError};
pub use validation::{RunOptions, ValidationOutcome, ValidationSummary};
