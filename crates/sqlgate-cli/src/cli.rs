//! CLI argument definitions for sqlgate.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use clap::{Parser, Subcommand};

/// sqlgate -- a unified SQL command-line client.
#[derive(Parser)]
#[command(
    name = "sqlgate",
    version,
    about = "sqlgate -- unified SQL command-line client",
    long_about = "Runs SQL statements against a database named by a URL. File URLs and \
                  bare paths open an embedded SQLite database."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute statements as one ordered batch and print the results.
    Exec {
        /// Database URL (falls back to the DATABASE_URL environment variable).
        #[arg(long, short)]
        url: Option<String>,

        /// Print results as JSON instead of aligned tables.
        #[arg(long)]
        json: bool,

        /// The SQL statements to run, in order.
        #[arg(required = true)]
        statements: Vec<String>,
    },

    /// Open an interactive SQL shell against the database.
    Shell {
        /// Database URL (falls back to the DATABASE_URL environment variable).
        #[arg(long, short)]
        url: Option<String>,
    },
}
