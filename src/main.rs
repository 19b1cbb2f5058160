//! iAssist - FAQ-grounded chat assistant backed by a hosted completion API.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tokio::io::BufReader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use iassist::config::{AssistConfig, ConfigLoader};
use iassist::server::ChatServer;
use iassist::startup::{bootstrap, StartupError};

#[derive(Parser)]
#[command(
    name = "iassist",
    about = "FAQ-grounded chat assistant backed by a hosted completion API",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a config file (defaults to .iassist.toml, then the user config dir).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// FAQ JSON file to load instead of the configured one.
    #[arg(long, global = true)]
    faq: Option<PathBuf>,

    /// Model identifier to request instead of the configured one.
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the chat page and JSON API over HTTP.
    Serve {
        /// Host address to bind to.
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat in the terminal.
    Chat,
    /// Run startup checks and report the loaded knowledge base.
    Check,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Print a fatal startup error and return the failure exit code.
fn halt(error: &StartupError) -> ExitCode {
    let label = match error {
        StartupError::Config(_) => "config error",
        StartupError::MissingApiKey(_) => "missing credential",
        StartupError::Knowledge(_) => "knowledge base error",
        StartupError::Client(_) => "client error",
    };
    eprintln!("{} {}", format!("Error ({label}):").red().bold(), error);
    ExitCode::FAILURE
}

fn load_config(cli: &Cli) -> Result<AssistConfig, StartupError> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path.clone()),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;

    if let Some(faq) = &cli.faq {
        config.knowledge.faq_path.clone_from(faq);
    }
    if let Some(model) = &cli.model {
        config.completion.model.clone_from(model);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => return halt(&e),
    };

    let orchestrator = match bootstrap(&config) {
        Ok(orchestrator) => Arc::new(orchestrator),
        Err(e) => return halt(&e),
    };

    match cli.command {
        Commands::Check => {
            println!(
                "{} knowledge base '{}' loaded with {} entries; model={}",
                "OK".green().bold(),
                config.knowledge.faq_path.display(),
                orchestrator.knowledge().entry_count(),
                orchestrator.settings().model
            );
            ExitCode::SUCCESS
        }
        Commands::Chat => {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            match iassist::console::run(&orchestrator, stdin, &mut stdout).await {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!(error = %e, "Console IO failed");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let server = ChatServer::new(orchestrator).with_config(config.server.clone());
            let cancel = server.state().cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Received Ctrl-C");
                    cancel.cancel();
                }
            });

            tracing::info!(
                address = %server.address(),
                model = %config.completion.model,
                "Starting iAssist"
            );
            match server.run().await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{} {e}", "Error:".red().bold());
                    ExitCode::FAILURE
                }
            }
        }
    }
}
