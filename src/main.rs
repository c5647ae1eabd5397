//! folio: keeps a website's rendered pages in sync with its content source.
//!
//! - `reconcile`: run one pass and exit
//! - `watch`: run passes on an interval until interrupted
//! - `show <id>`: print a stored page
//! - `versions`: list stored pages and their versions

mod app;
mod commands;
mod error;

use crate::app::App;
use crate::error::{ErrorKind, Result};
use clap::{Parser, Subcommand};
use exn::ResultExt;
use folio_config::{Backend, Config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(short, long, global = true, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,
    /// Log at debug level (ignores RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Render pages without writing to or deleting from the store.
    #[arg(long, global = true)]
    dry_run: bool,
    /// Use a throwaway in-memory store.
    #[arg(long, global = true)]
    memory: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single reconciliation pass.
    Reconcile,
    /// Reconcile now and then on every interval, until Ctrl-C.
    Watch,
    /// Print the stored bytes of a page.
    Show {
        /// Page id (an item slug, or one of blog_page, about_page, 404_page).
        id: String,
    },
    /// List stored pages with their versions.
    Versions,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if cli.dry_run {
        config.reconcile.dry_run = true;
    }
    if cli.memory {
        config.store.backend = Backend::Memory;
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    let app = App::open(config).await?;
    let code = match &cli.command {
        Command::Reconcile => commands::reconcile(&app).await,
        Command::Watch => commands::watch(&app).await,
        Command::Show { id } => commands::show(&app, id).await,
        Command::Versions => commands::versions(&app).await,
    };
    app.close().await;
    code
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = ?e, "folio failed");
            ExitCode::FAILURE
        },
    }
}
