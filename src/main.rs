//! `request-dispatcher`: send one request through the dispatcher.
//!
//! ```text
//! request-dispatcher --base-url http://hooks.local --uri /notify \
//!     --method post --payload 'order=42' --raw-socket
//! ```
//!
//! The exit status does not reflect the request outcome; check the logs.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use request_dispatcher::config::loader::{apply_env_overrides, load_config};
use request_dispatcher::config::validation::validate_config;
use request_dispatcher::config::{DispatcherConfig, Environment};
use request_dispatcher::observability::{logging, metrics};
use request_dispatcher::{Dispatcher, HttpMethod, RequestSpec, TracingSink};

#[derive(Parser)]
#[command(name = "request-dispatcher")]
#[command(about = "Dispatch a single outbound HTTP request and log the outcome", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the deployment environment.
    #[arg(short, long)]
    environment: Option<Environment>,

    /// Scheme and host, e.g. http://example.com
    #[arg(long)]
    base_url: String,

    /// Path appended to the base URL.
    #[arg(long)]
    uri: String,

    #[arg(short, long, default_value = "GET")]
    method: HttpMethod,

    #[arg(short, long)]
    payload: Option<String>,

    /// Extra header as 'Name: value'. Repeatable.
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Write the request to a bare socket and skip the response.
    #[arg(long)]
    raw_socket: bool,

    /// GET only: send the payload as a query string.
    #[arg(long)]
    query_string: bool,

    /// Request timeout in seconds.
    #[arg(short, long)]
    timeout: Option<f64>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{}'", raw))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = DispatcherConfig::default();
            apply_env_overrides(&mut config, std::env::var("APP_ENVIRONMENT").ok().as_deref())?;
            config
        }
    };
    if let Some(environment) = cli.environment {
        config.environment = environment;
    }
    validate_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    })?;

    logging::init(&config.observability);

    tracing::info!(
        environment = %config.environment,
        timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut spec = RequestSpec::new(cli.base_url, cli.uri)
        .method(cli.method)
        .raw_socket(cli.raw_socket)
        .query_string(cli.query_string);
    if let Some(payload) = cli.payload {
        spec = spec.payload(payload);
    }
    for (name, value) in cli.headers {
        spec = spec.header(name, value);
    }
    spec.timeout_secs = cli.timeout;

    let dispatcher = Dispatcher::new(config, Arc::new(TracingSink));
    dispatcher.dispatch(spec).await;

    tracing::info!("Dispatch complete");
    Ok(())
}
