//! Admin request CLI.
//!
//! Issues one call through the full pipeline and prints the payload, or the
//! classified rejection together with every navigation it triggered.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use admin_request::config::{load_config, ClientConfig};
use admin_request::observability::logging::init_logging;
use admin_request::session::{MemoryNavigator, SharedToken};
use admin_request::{AdminClient, RequestError, RequestOptions};

#[derive(Parser)]
#[command(name = "admin-request")]
#[command(about = "Call the admin backend through the request pipeline", long_about = None)]
struct Cli {
    /// TOML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured base URL
    #[arg(short, long)]
    base_url: Option<String>,

    /// Bearer token
    #[arg(short, long)]
    token: Option<String>,

    /// Route the app is on when the call is made
    #[arg(short, long, default_value = "/")]
    path: String,

    /// Extra query pair, `key=value` (repeatable)
    #[arg(short, long = "query", value_parser = parse_pair)]
    query: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a resource
    Get { target: String },
    /// POST a JSON body
    Post { target: String, body: Option<String> },
    /// PUT a JSON body
    Put { target: String, body: Option<String> },
    /// PATCH a JSON body
    Patch { target: String, body: Option<String> },
    /// DELETE a resource
    Delete { target: String },
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn parse_body(body: Option<String>) -> Result<Option<Value>, serde_json::Error> {
    body.map(|b| serde_json::from_str(&b)).transpose()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.transport.base_url = base_url;
    }
    init_logging(&config.observability);

    tracing::info!(
        base_url = %config.transport.base_url,
        timeout_ms = config.transport.timeout_ms,
        "Configuration loaded"
    );

    let redirect_delay = config.navigation.redirect_delay();
    let navigator = Arc::new(MemoryNavigator::new(cli.path));
    let client = AdminClient::builder(config)
        .navigator(navigator.clone())
        .tokens(Arc::new(SharedToken::new(cli.token)))
        .build()?;

    let mut options = RequestOptions::new();
    for (key, value) in cli.query {
        options = options.query(key, value);
    }

    let result: Result<Value, RequestError> = match cli.command {
        Commands::Get { target } => client.get(&target, Some(options)).await,
        Commands::Delete { target } => client.delete(&target, Some(options)).await,
        Commands::Post { target, body } => {
            client.post(&target, parse_body(body)?.as_ref(), Some(options)).await
        }
        Commands::Put { target, body } => {
            client.put(&target, parse_body(body)?.as_ref(), Some(options)).await
        }
        Commands::Patch { target, body } => {
            client.patch(&target, parse_body(body)?.as_ref(), Some(options)).await
        }
    };

    // Let a scheduled login redirect fire before reporting.
    if client.coordinator().has_pending_redirect() {
        tokio::time::sleep(redirect_delay + Duration::from_millis(50)).await;
    }

    let failed = result.is_err();
    match result {
        Ok(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
        Err(RequestError::Rejected(rejection)) => {
            eprintln!("Error [{}]: {}", rejection.category(), rejection.message());
            if let Some(status) = rejection.status() {
                eprintln!("Status: {}", status);
            }
            if let Some(trace_id) = rejection.trace_id() {
                eprintln!("Trace ID: {}", trace_id);
            }
            if let Some(info) = rejection.error_info() {
                if let Some(code) = info.code {
                    eprintln!("Code: {}", code);
                }
                if let Some(kind) = rejection.conflict_kind() {
                    eprintln!("Conflict: {:?}", kind);
                }
            }
        }
        Err(e) => eprintln!("Error: {}", e),
    }

    for record in navigator.history() {
        eprintln!("Navigated ({:?}): {}", record.mode, record.href);
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
