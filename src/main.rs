//! Command-line HTTP client with retries.
//!
//! ```text
//! resilient-http [-X METHOD] [-d DATA] [-H 'Name: value']... [-c CONFIG]
//!                [--max-tries N] [-i] URL
//! ```
//!
//! Settings come from an optional TOML file; `--max-tries` overrides the
//! file. Ctrl+C abandons the request, including any pending backoff.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use bytes::Bytes;
use clap::Parser;
use http::{HeaderName, HeaderValue, Method, Request};
use http_body_util::Full;

use resilient_http::body;
use resilient_http::config::{load_config, validate_config, ClientConfig, ConfigError};
use resilient_http::lifecycle::{cancel_on_ctrl_c, cancellation};
use resilient_http::observability::{logging, metrics};
use resilient_http::new_client;

#[derive(Parser, Debug)]
#[command(name = "resilient-http")]
#[command(about = "Send one HTTP request with retries and connection deadlines", long_about = None)]
struct Cli {
    /// Request method
    #[arg(short = 'X', long = "request", default_value = "GET")]
    method: String,

    /// Request body
    #[arg(short, long)]
    data: Option<String>,

    /// Extra request header as `Name: value`
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total attempts, overriding the configuration file
    #[arg(long)]
    max_tries: Option<u32>,

    /// Print the status line and response headers
    #[arg(short, long)]
    include: bool,

    url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability.log_level);
    metrics::set_enabled(config.observability.metrics_enabled);

    let source = match &cli.config {
        Some(path) => path.display().to_string(),
        None => "defaults".to_string(),
    };
    tracing::debug!(
        source = %source,
        max_tries = config.retries.max_tries,
        backoff = ?config.retries.backoff,
        deadline_ms = config.timeouts.deadline_ms,
        "Configuration loaded"
    );

    let transport = config
        .transport_config()
        .on_retry(|parts, outcome, attempt| {
            let (method, uri) = (&parts.method, &parts.uri);
            match outcome {
                Ok(res) => {
                    eprintln!("retrying {method} {uri} after attempt {attempt}: {}", res.status())
                }
                Err(e) => eprintln!("retrying {method} {uri} after attempt {attempt}: {e}"),
            }
        });
    let client = new_client(transport);

    let request = build_request(&cli)?;

    let (handle, cancel) = cancellation();
    cancel_on_ctrl_c(handle);

    let response = client.request_with_cancel(request, &cancel).await?;

    let (parts, body) = response.into_parts();
    let payload = body::to_bytes(body).await?;

    let mut stdout = std::io::stdout().lock();
    if cli.include {
        writeln!(stdout, "{:?} {}", parts.version, parts.status)?;
        for (name, value) in &parts.headers {
            writeln!(stdout, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()))?;
        }
        writeln!(stdout)?;
    }
    stdout.write_all(&payload)?;
    stdout.flush()?;

    Ok(())
}

/// Configuration file (or defaults) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(max_tries) = cli.max_tries {
        config.retries.max_tries = max_tries;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

fn build_request(cli: &Cli) -> Result<Request<Full<Bytes>>, Box<dyn std::error::Error>> {
    let method = Method::from_bytes(cli.method.to_ascii_uppercase().as_bytes())?;
    let mut builder = Request::builder().method(method).uri(cli.url.as_str());

    for header in &cli.headers {
        let (name, value) = parse_header(header)?;
        builder = builder.header(name, value);
    }

    let body = cli.data.clone().map(Bytes::from).unwrap_or_default();
    Ok(builder.body(Full::new(body))?)
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), Box<dyn std::error::Error>> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("malformed header {raw:?}, expected `Name: value`"))?;
    Ok((
        HeaderName::from_bytes(name.trim().as_bytes())?,
        HeaderValue::from_str(value.trim())?,
    ))
}
