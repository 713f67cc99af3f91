//! gql-validate - validate GraphQL queries against a live database
//!
//! Queries are compiled and executed by a GraphQL-to-SQL engine; any error it
//! reports, at the top level or nested inside the returned data, fails the
//! query.

use clap::Parser;
use gql_validate::cli;
use gql_validate::commands::{Commands, GlobalArgs};
use gql_validate::common::logging;

#[derive(Parser)]
#[command(name = "gql-validate", about = "A GraphQL query validation tool")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.global.verbose);

    let code = match cli::dispatch(cli.command, &cli.global).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}
