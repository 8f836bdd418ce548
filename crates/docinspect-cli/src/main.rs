//! docinspect: Inspect document chunks served by a protected API.
//!
//! Signs in with the device authorization grant, then fetches a document
//! chunk by id and prints its metadata and content.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docinspect_auth::{AuthConfig, CredentialBroker, DeviceCodeProvider};
use docinspect_cli::render::{render_chunk, render_error, render_json, render_welcome};
use docinspect_cli::{SearchOrchestrator, SearchOutcome, Session, StderrPrompt};
use docinspect_client::{ApiClient, ApiConfig};
use docinspect_core::defaults;

#[derive(Parser)]
#[command(name = "docinspect")]
#[command(author, version, about = "Inspect document chunks from the knowledge API")]
#[command(propagate_version = true)]
struct Cli {
    /// Resource API base URL (overrides DOCINSPECT_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Public client id (overrides DOCINSPECT_CLIENT_ID)
    #[arg(long, global = true)]
    client_id: Option<String>,

    /// Identity authority URL (overrides DOCINSPECT_AUTHORITY)
    #[arg(long, global = true)]
    authority: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one document chunk and print it
    Search {
        /// Document chunk id
        id: String,

        /// Print the canonical record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in and show the account
    SignIn,

    /// Probe the resource API health endpoint
    Health,

    /// Start an interactive session (default)
    Shell,
}

type Orchestrator = SearchOrchestrator<DeviceCodeProvider>;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing on stderr, or on a daily-rotated file when `LOG_FILE`
/// is set.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional)
///   RUST_LOG    - standard env filter
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| defaults::LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let file_dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("docinspect.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

fn build(cli: &Cli) -> anyhow::Result<Orchestrator> {
    let mut auth_config = AuthConfig::from_env();
    if let Some(client_id) = &cli.client_id {
        auth_config.client_id = client_id.clone();
    }
    if let Some(authority) = &cli.authority {
        auth_config.authority = authority.clone();
    }

    let mut api_config = ApiConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        api_config = api_config.with_base_url(base_url.clone());
    }

    let provider = DeviceCodeProvider::new(auth_config.clone(), Arc::new(StderrPrompt))?
        .with_interrupt_cancellation(true);
    let broker = CredentialBroker::new(Arc::new(provider), &auth_config);
    let client = ApiClient::new(api_config)?;

    Ok(SearchOrchestrator::new(broker, client))
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let orchestrator = build(&cli)?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Search { id, json } => cmd_search(&orchestrator, &id, json).await,
        Commands::SignIn => cmd_sign_in(&orchestrator).await,
        Commands::Health => cmd_health(&orchestrator).await,
        Commands::Shell => cmd_shell(&orchestrator).await,
    }
}

async fn cmd_search(orchestrator: &Orchestrator, id: &str, json: bool) -> anyhow::Result<ExitCode> {
    match orchestrator.search(id).await {
        SearchOutcome::Found(chunk) => {
            if json {
                println!("{}", render_json(&chunk)?);
            } else {
                println!("{}", render_chunk(&chunk));
            }
            Ok(ExitCode::SUCCESS)
        }
        SearchOutcome::Dismissed => Ok(ExitCode::SUCCESS),
        SearchOutcome::Failed(err) => {
            eprintln!("{}", render_error(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn cmd_sign_in(orchestrator: &Orchestrator) -> anyhow::Result<ExitCode> {
    match orchestrator.broker().sign_in().await {
        Ok(identity) => {
            println!("{}", render_welcome(&identity));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if err.is_silent() => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}", render_error(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn cmd_health(orchestrator: &Orchestrator) -> anyhow::Result<ExitCode> {
    match orchestrator.health().await {
        Ok(true) => {
            println!("Resource API is healthy.");
            Ok(ExitCode::SUCCESS)
        }
        Ok(false) => {
            println!("Resource API is unhealthy.");
            Ok(ExitCode::FAILURE)
        }
        Err(err) if err.is_silent() => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}", render_error(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn cmd_shell(orchestrator: &Orchestrator) -> anyhow::Result<ExitCode> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let failures = Session::new(orchestrator).run(stdin, &mut stdout).await?;
    info!(failures, "Session ended");
    Ok(ExitCode::SUCCESS)
}
