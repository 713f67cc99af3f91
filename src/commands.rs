//! CLI command definitions
//!
//! Defines the clap commands for gql-validate.

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Flags accepted by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file path
    #[arg(long, short, global = true, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Output results as JSON
    #[arg(long, short, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate GraphQL queries against the database
    ///
    /// Each query file is compiled and executed once by the engine. A query
    /// passes only if the engine accepts it and the response carries no errors
    /// at any depth.
    Validate {
        /// Directory containing GraphQL query files
        #[arg(long, short, default_value = "./queries")]
        queries: PathBuf,

        /// Single GraphQL file to validate
        #[arg(long, short)]
        file: Option<PathBuf>,

        /// Stop on first validation failure
        #[arg(long)]
        fail_fast: bool,

        /// Number of queries to run concurrently
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
        jobs: u16,
    },

    /// List available GraphQL query files
    List {
        /// Directory containing GraphQL query files
        #[arg(long, short, default_value = "./queries")]
        queries: PathBuf,

        /// Show full file paths
        #[arg(long)]
        full_path: bool,
    },

    /// Check database connection and configuration
    Check,

    /// Initialize a new GraphQL validation project
    Init {
        /// Directory to initialize the project in
        #[arg(long, short, default_value = ".")]
        dir: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        overwrite: bool,
    },
}
