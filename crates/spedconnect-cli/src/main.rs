//! SpEd Connect CLI - sign in to SpEd Connect and manage your provider
//! listing, services, plans and coupon codes from the terminal.

mod app;
mod cli;

use std::io;

use anyhow::Result;
use clap::Parser;
use spedconnect_core::ApiError;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use cli::Cli;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Prefer the backend's own message for API failures.
fn describe(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ApiError>() {
        Some(api_error) => api_error
            .server_message()
            .unwrap_or_else(|| api_error.to_string()),
        None => format!("{:#}", error),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    info!(route = ?cli.command.route(), "SpEd Connect CLI starting");

    let result = match App::new() {
        Ok(mut app) => app.run(cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", describe(&e));
        std::process::exit(1);
    }
    Ok(())
}
