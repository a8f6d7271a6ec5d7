//! Platter command line entry point.
//!
//! Usage:
//!   platter split [FILE|-]        split a bill; reads `{ "order", "request" }` JSON
//!   platter transition FROM TO    check a kitchen status transition
//!   platter orders [FILE|-] [STATUS]  kitchen queue, status counts and filtered orders

use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use platter_core::split::SplitBook;
use platter_shared::{AppConfig, AppError, LoggingConfig};

mod commands;

const USAGE: &str =
    "usage: platter split [FILE|-] | platter transition FROM TO | platter orders [FILE|-] [STATUS]";

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = match args.first().map(String::as_str) {
        Some("split") => {
            let body = read_body(args.get(1).map(String::as_str))?;
            let book = SplitBook::new();
            commands::split(&body, &book, &config.split).map(|record| render(&record))
        }
        Some("orders") => {
            let body = read_body(args.get(1).map(String::as_str))?;
            commands::parse_orders(&body).and_then(|list| {
                commands::orders(&list, args.get(2).map(String::as_str)).map(|view| render(&view))
            })
        }
        Some("transition") if args.len() == 3 => {
            commands::transition(&args[1], &args[2]).map(|status| render(&json!({ "status": status })))
        }
        _ => {
            eprintln!("{USAGE}");
            return Ok(ExitCode::FAILURE);
        }
    };

    match outcome {
        Ok(rendered) => {
            println!("{}", rendered?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            info!(code = err.error_code(), status = err.status_code(), "Command failed");
            println!("{}", render_error(&err)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Console output goes to stderr so stdout carries only the JSON response.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let json_layer = logging
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!logging.json)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn read_body(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        None | Some("-") => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request from stdin")?;
            Ok(body)
        }
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}")),
    }
}

fn render<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize response")
}

fn render_error(err: &AppError) -> anyhow::Result<String> {
    render(&json!({ "error": err.to_body() }))
}
