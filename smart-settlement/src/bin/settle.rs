//! Settlement calculator binary
//!
//! Reads a request from the file given as the first argument, or from
//! stdin, and writes the settlement plan as JSON to stdout.

use anyhow::Context;
use smart_settlement::{Config, ErrorResponse, SettlementCalculator, SettlementRequest};
use std::io::Read;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match std::env::var("SETTLEMENT_CONFIG") {
        Ok(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        Err(_) => Config::from_env().context("Failed to load config from environment")?,
    };
    tracing::debug!(
        "Starting {} v{}",
        config.service_name,
        config.service_version
    );

    let body = read_input(std::env::args().nth(1))?;
    let calculator = SettlementCalculator::new(config)?;

    let outcome =
        SettlementRequest::from_json(&body).and_then(|request| calculator.calculate_request(&request));

    match outcome {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let code = if e.is_input_error() { 2 } else { 1 };
            tracing::error!("Settlement calculation failed: {}", e);
            println!("{}", serde_json::to_string_pretty(&ErrorResponse::from_error(&e))?);
            Ok(ExitCode::from(code))
        }
    }
}

fn read_input(path: Option<String>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read request from {}", path)),
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request from stdin")?;
            Ok(body)
        }
    }
}
