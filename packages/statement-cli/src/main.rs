//! `statements`: extract transactions from PDF bank statements

mod cmd;
mod config;
mod context;
mod interactive;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "statements", about = "Extract transactions from PDF bank statements")]
struct Cli {
    /// Extraction service URL (overrides STATEMENT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Only print results and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Interactive {
        /// PDF to select on start
        file: Option<PathBuf>,
    },
    /// Extract one statement and print the rows
    Extract {
        /// PDF statement
        file: PathBuf,
        /// Column to extract (repeatable, in display order)
        #[arg(short = 'c', long = "column", required = true)]
        columns: Vec<String>,
        /// Also write the rows as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that the extraction service is up
    Health,
    /// List suggested columns
    Suggest {
        /// Bank to get suggestions for
        #[arg(long)]
        bank: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so tables and CSV on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,statement_session=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{} {:#}", "✗".bright_red(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_api_url(cli.api_url);
    tracing::debug!(api_url = %config.api_url, timeout = ?config.timeout, "Configuration loaded");

    let ctx = AppContext::new(config, cli.quiet)?;

    match cli.command.unwrap_or(Commands::Interactive { file: None }) {
        Commands::Interactive { file } => interactive::run_interactive(&ctx, file).await,
        Commands::Extract {
            file,
            columns,
            output,
        } => cmd::extract::extract(&ctx, &file, &columns, output.as_deref()).await,
        Commands::Health => cmd::health::check_health(&ctx).await,
        Commands::Suggest { bank } => cmd::suggest::suggest(&ctx, bank.as_deref()).await,
    }
}
