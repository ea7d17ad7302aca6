//! CLI entry point for sqlgate.
//!
//! This binary provides the `sqlgate` command with subcommands for
//! executing statement batches and for an interactive SQL shell.

mod cli;
mod output;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use sqlgate_client::{Client, Statement};
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Exec {
            url,
            json,
            statements,
        } => cmd_exec(url, json, statements).await,
        Commands::Shell { url } => cmd_shell(url).await,
    }
}

// ---------------------------------------------------------------------------
// Subcommand: exec
// ---------------------------------------------------------------------------

async fn cmd_exec(url: Option<String>, json: bool, statements: Vec<String>) -> Result<()> {
    init_tracing("warn");

    let client = connect(url).await?;
    let stmts: Vec<Statement> = statements.into_iter().map(Statement::new).collect();
    let results = client.batch(stmts).await?;

    if json {
        let rendered: Vec<serde_json::Value> = results.iter().map(output::render_json).collect();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        for (i, rs) in results.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", output::render_table(rs));
        }
    }

    client.close().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: shell
// ---------------------------------------------------------------------------

async fn cmd_shell(url: Option<String>) -> Result<()> {
    init_tracing("warn");

    let client = connect(url).await?;

    println!();
    println!("  sqlgate v{}", env!("CARGO_PKG_VERSION"));
    println!("  Enter SQL statements, or 'quit' to exit.");
    println!();

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("sql> ");
        io::stdout().flush()?;

        line.clear();
        let bytes_read = stdin.lock().read_line(&mut line).context("failed to read input")?;
        if bytes_read == 0 {
            println!();
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }

        match client.execute(trimmed).await {
            Ok(rs) => print!("{}", output::render_table(&rs)),
            Err(e) => {
                error!(error = %e, "statement failed");
                eprintln!("  Error: {e}");
            }
        }
    }

    client.close().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the database URL from the flag or `DATABASE_URL`, then connect.
async fn connect(url: Option<String>) -> Result<Client> {
    let url = match url {
        Some(url) => url,
        None => std::env::var("DATABASE_URL")
            .context("no database given: pass --url or set DATABASE_URL")?,
    };

    Client::connect(&url)
        .await
        .with_context(|| format!("failed to connect to {url}"))
}

/// Initialize the tracing subscriber with the given default log level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
