//! strata - CLI for synthesizing topology plans.
//!
//! The interface for turning a deployment manifest into a provisioning
//! plan for the external platform.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod manifest;
mod output;

use commands::Cli;

fn main() -> Result<()> {
    // Prefer RUST_LOG, fall back to STRATA_LOG_LEVEL, default to warn.
    let fallback =
        std::env::var("STRATA_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
