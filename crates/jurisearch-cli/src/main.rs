mod app;
mod display;
mod interactive;
mod results_log;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use jurisearch_portal::PortalConfig;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::results_log::ResultsLog;

/// Count matching records on the judicial-records portal.
#[derive(Parser)]
#[command(name = "jurisearch", version)]
struct Cli {
    #[command(flatten)]
    portal: PortalArgs,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true, env = "JURISEARCH_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct PortalArgs {
    /// JSON file overriding portal endpoints, form fields and markers.
    #[arg(long, global = true, env = "JURISEARCH_PORTAL_CONFIG")]
    portal_config: Option<PathBuf>,

    /// Portal base URL.
    #[arg(long, global = true, env = "JURISEARCH_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, env = "JURISEARCH_TIMEOUT_MS")]
    timeout_ms: Option<u64>,
}

impl PortalArgs {
    fn load(&self) -> anyhow::Result<PortalConfig> {
        let mut config = match &self.portal_config {
            Some(path) => PortalConfig::from_json_file(path)?,
            None => PortalConfig::default(),
        };
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Negotiate a session and run a single search.
    Search {
        /// Free-text query.
        query: String,

        /// Jurisdiction label, filter id or English name (repeatable or comma-separated).
        #[arg(short, long = "jurisdiction", value_delimiter = ',')]
        jurisdictions: Vec<String>,

        /// CSV file successful searches are appended to.
        #[arg(long, default_value = "results.csv")]
        results: PathBuf,
    },
    /// Negotiate once, then read `query | jurisdictions` lines from stdin.
    Interactive {
        #[arg(long, default_value = "results.csv")]
        results: PathBuf,

        /// Renegotiate once and retry when the session expires.
        #[arg(long)]
        reauth: bool,
    },
    /// List the jurisdictions the portal can filter on.
    Jurisdictions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;
    tracing::info!("jurisearch v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Jurisdictions => display::print_jurisdictions(),
        Command::Search {
            query,
            jurisdictions,
            results,
        } => {
            let mut app = App::connect(cli.portal.load()?, ResultsLog::new(results), false)?;
            app.negotiate()
                .await
                .context("Failed to initialize session")?;
            eprintln!("Searching for: {query} in {}", jurisdictions.join(", "));
            match app.search(&query, &jurisdictions).await {
                Ok(count) => println!("Total results: {count}"),
                Err(e) => bail!(display::search_failure_message(&e, false)),
            }
        }
        Command::Interactive { results, reauth } => {
            let mut app = App::connect(cli.portal.load()?, ResultsLog::new(results), reauth)?;
            app.negotiate()
                .await
                .context("Failed to initialize session")?;
            eprintln!("Session ready.");
            interactive::run(&mut app).await?;
        }
    }
    Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}
